use anyhow::{Context, Result};
use musicvault_core::catalog::{BandishCatalog, BandishListing, DEFAULT_SEARCH_LIMIT};
use musicvault_core::model::{BandishId, BandishKind, NewBandish, RagaId, Tempo};
use musicvault_core::Gateway;
use std::sync::Arc;

#[derive(Debug, clap::Subcommand)]
pub enum BandishAction {
    /// Add a bandish
    Add {
        title: String,
        /// Raga id; omit for a general note
        #[arg(long)]
        raga: Option<RagaId>,
        /// khayal, dhrupad, thumri, bhajan, general_note or other
        #[arg(long, default_value = "khayal")]
        kind: BandishKind,
        /// vilambit, madhya or drut
        #[arg(long, default_value = "madhya")]
        tempo: Tempo,
        #[arg(long, default_value = "")]
        tala: String,
        #[arg(long)]
        composer: Option<String>,
        #[arg(long, default_value = "")]
        lyrics: String,
        /// Location of a recording
        #[arg(long)]
        audio: Option<String>,
        /// Location of a notation image
        #[arg(long)]
        notation: Option<String>,
    },
    /// List bandishes, newest first, optionally filtered by title, raga or lyrics
    List { filter: Option<String> },
    /// Search titles as you would when adding to a setlist
    Search {
        term: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Delete a bandish
    Delete { id: BandishId },
}

pub async fn run(action: BandishAction, gateway: Arc<dyn Gateway>) -> Result<()> {
    let bandishes = BandishCatalog::new(gateway);

    match action {
        BandishAction::Add {
            title,
            raga,
            kind,
            tempo,
            tala,
            composer,
            lyrics,
            audio,
            notation,
        } => {
            let mut bandish = NewBandish::new(title)
                .with_kind(kind)
                .with_tempo(tempo)
                .with_tala(tala)
                .with_lyrics(lyrics);
            bandish.raga_id = raga;
            bandish.composer = composer;
            bandish.audio_ref = audio;
            bandish.notation_ref = notation;

            let created = bandishes
                .create(&bandish)
                .await
                .context("Failed to add bandish")?;
            println!("✓ Added bandish {} ({})", created.title, created.id);
        }
        BandishAction::List { filter } => {
            let listings = bandishes.filter(filter.as_deref().unwrap_or("")).await?;
            if listings.is_empty() {
                println!("No bandishes found.");
            }
            print_listings(&listings);
        }
        BandishAction::Search { term, limit } => {
            let hits = bandishes.search_titles(&term, limit).await?;
            if hits.is_empty() {
                println!("No matches for '{}'.", term);
            }
            print_listings(&hits);
        }
        BandishAction::Delete { id } => {
            bandishes.delete(id).await?;
            println!("✓ Deleted bandish {}", id);
        }
    }

    Ok(())
}

pub(crate) fn print_listings(listings: &[BandishListing]) {
    for listing in listings {
        let bandish = &listing.bandish;
        println!(
            "{}  {:<28} {} · {} · {}",
            bandish.id,
            bandish.title,
            listing.raga_name.as_deref().unwrap_or("General"),
            bandish.kind,
            bandish.tempo
        );
    }
}
