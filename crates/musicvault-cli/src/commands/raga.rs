use anyhow::{Context, Result};
use musicvault_core::catalog::RagaCatalog;
use musicvault_core::model::{NewBandish, NewRaga, Raga, RagaId};
use musicvault_core::Gateway;
use std::sync::Arc;

#[derive(Debug, clap::Subcommand)]
pub enum RagaAction {
    /// Add a raga, optionally with bandish titles to create in it
    Add {
        name: String,
        #[arg(long, default_value = "")]
        thaat: String,
        /// Time of performance, e.g. "first prahar of night"
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        vadi: String,
        #[arg(long, default_value = "")]
        samvadi: String,
        #[arg(long, default_value = "")]
        aroha: String,
        #[arg(long, default_value = "")]
        avroha: String,
        #[arg(long, default_value = "")]
        pakad: String,
        #[arg(long)]
        description: Option<String>,
        /// Bandish title to create in this raga (repeatable)
        #[arg(long = "bandish")]
        bandishes: Vec<String>,
    },
    /// List ragas alphabetically
    List,
    /// Show a raga with its bandishes
    Show { id: RagaId },
    /// Delete a raga; its bandishes are kept without a raga
    Delete { id: RagaId },
    /// Find ragas whose aroha, avroha or pakad contain a swara phrase
    Swaras { sequence: String },
}

pub async fn run(action: RagaAction, gateway: Arc<dyn Gateway>) -> Result<()> {
    let ragas = RagaCatalog::new(gateway);

    match action {
        RagaAction::Add {
            name,
            thaat,
            time,
            vadi,
            samvadi,
            aroha,
            avroha,
            pakad,
            description,
            bandishes,
        } => {
            let mut raga = NewRaga::new(name)
                .with_thaat(thaat)
                .with_time(time)
                .with_vadi_samvadi(vadi, samvadi)
                .with_lines(aroha, avroha, pakad);
            if let Some(description) = description {
                raga = raga.with_description(description);
            }
            let count = bandishes.len();
            let bandishes = bandishes.into_iter().map(NewBandish::new).collect();
            let created = ragas
                .create_with_bandishes(&raga, bandishes)
                .await
                .context("Failed to add raga")?;
            println!("✓ Added raga {} ({})", created.name, created.id);
            if count > 0 {
                println!("  with {} bandishes", count);
            }
        }
        RagaAction::List => print_ragas(&ragas.list().await?),
        RagaAction::Show { id } => {
            let detail = ragas.get(id).await?;
            let raga = &detail.raga;
            println!("\n{}\n", raga.name);
            print_field("Thaat", &raga.thaat);
            print_field("Time", &raga.time);
            print_field("Vadi", &raga.vadi);
            print_field("Samvadi", &raga.samvadi);
            print_field("Aroha", &raga.aroha);
            print_field("Avroha", &raga.avroha);
            print_field("Pakad", &raga.pakad);
            if let Some(description) = &raga.description {
                println!("\n{}", description);
            }
            println!("\nBandishes ({}):", detail.bandishes.len());
            for bandish in &detail.bandishes {
                println!(
                    "  {}  {} · {} · {}",
                    bandish.id, bandish.title, bandish.kind, bandish.tala
                );
            }
        }
        RagaAction::Delete { id } => {
            ragas.delete(id).await?;
            println!("✓ Deleted raga {}", id);
        }
        RagaAction::Swaras { sequence } => {
            let found = ragas.search_by_swaras(&sequence).await?;
            if found.is_empty() {
                println!("No raga contains '{}'.", sequence);
            } else {
                print_ragas(&found);
            }
        }
    }

    Ok(())
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("  {:<8} {}", label, value);
    }
}

fn print_ragas(ragas: &[Raga]) {
    if ragas.is_empty() {
        println!("No ragas yet. Add one with 'musicvault raga add'.");
        return;
    }
    for raga in ragas {
        println!("{}  {:<20} {}", raga.id, raga.name, raga.thaat);
    }
}
