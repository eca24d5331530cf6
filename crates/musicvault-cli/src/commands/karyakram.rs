use anyhow::Result;
use chrono::NaiveDate;
use musicvault_core::catalog::KaryakramCatalog;
use musicvault_core::model::{Karyakram, KaryakramId, KaryakramStatus, NewKaryakram};
use musicvault_core::Gateway;
use musicvault_setlist::Setlist;
use std::sync::Arc;

#[derive(Debug, clap::Subcommand)]
pub enum KaryakramAction {
    /// Plan a new karyakram
    New {
        title: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// planned, completed or draft
        #[arg(long, default_value = "planned")]
        status: KaryakramStatus,
    },
    /// List karyakrams by date, undated last
    List,
    /// Show details and setlist
    Show { id: KaryakramId },
    /// Change details; unspecified fields are kept
    Update {
        id: KaryakramId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<KaryakramStatus>,
    },
    /// Delete a karyakram and its setlist
    Delete { id: KaryakramId },
}

pub async fn run(action: KaryakramAction, gateway: Arc<dyn Gateway>) -> Result<()> {
    let karyakrams = KaryakramCatalog::new(Arc::clone(&gateway));

    match action {
        KaryakramAction::New {
            title,
            date,
            venue,
            notes,
            status,
        } => {
            let details = NewKaryakram {
                title,
                date,
                venue,
                notes,
                status,
            };
            let created = karyakrams.create(&details).await?;
            println!("✓ Planned {} ({})", created.title, created.id);
        }
        KaryakramAction::List => {
            let events = karyakrams.list().await?;
            if events.is_empty() {
                println!("No karyakrams planned.");
            }
            for event in &events {
                print_summary(event);
            }
        }
        KaryakramAction::Show { id } => {
            let setlist = Setlist::load(&*gateway, id).await?;
            let event = setlist.event();
            print_summary(event);
            if let Some(notes) = &event.notes {
                println!("\n{}", notes);
            }
            println!();
            super::setlist::print_setlist(&setlist);
        }
        KaryakramAction::Update {
            id,
            title,
            date,
            venue,
            notes,
            status,
        } => {
            let current = karyakrams.get(id).await?;
            let mut details = NewKaryakram::from(&current);
            if let Some(title) = title {
                details.title = title;
            }
            if date.is_some() {
                details.date = date;
            }
            if venue.is_some() {
                details.venue = venue;
            }
            if notes.is_some() {
                details.notes = notes;
            }
            if let Some(status) = status {
                details.status = status;
            }
            let updated = karyakrams.update_details(id, &details).await?;
            println!("✓ Updated {}", updated.title);
        }
        KaryakramAction::Delete { id } => {
            karyakrams.delete(id).await?;
            println!("✓ Deleted karyakram {}", id);
        }
    }

    Ok(())
}

fn print_summary(event: &Karyakram) {
    let date = event
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    println!(
        "{}  {:<10} {:<28} {} [{}]",
        event.id,
        date,
        event.title,
        event.venue.as_deref().unwrap_or(""),
        event.status
    );
}
