use anyhow::Result;
use musicvault_core::catalog::DiaryCatalog;
use musicvault_core::model::NewDiaryEntry;
use musicvault_core::Gateway;
use std::sync::Arc;

#[derive(Debug, clap::Subcommand)]
pub enum DiaryAction {
    /// Write a diary entry
    Add {
        title: String,
        content: String,
        /// Location of an attached image
        #[arg(long)]
        image: Option<String>,
    },
    /// List entries, newest first
    List,
}

pub async fn run(action: DiaryAction, gateway: Arc<dyn Gateway>) -> Result<()> {
    let diary = DiaryCatalog::new(gateway);

    match action {
        DiaryAction::Add {
            title,
            content,
            image,
        } => {
            let mut entry = NewDiaryEntry::new(title, content);
            if let Some(image) = image {
                entry = entry.with_image_ref(image);
            }
            let created = diary.create(&entry).await?;
            println!("✓ Saved entry {}", created.title);
        }
        DiaryAction::List => {
            let entries = diary.list().await?;
            if entries.is_empty() {
                println!("The diary is empty.");
            }
            for entry in entries {
                println!("\n{}  {}", entry.created_at.format("%Y-%m-%d"), entry.title);
                println!("{}", entry.content);
            }
        }
    }

    Ok(())
}
