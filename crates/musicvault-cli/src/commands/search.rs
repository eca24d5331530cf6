use anyhow::Result;
use musicvault_core::catalog::{BandishCatalog, RagaCatalog, MIN_SEARCH_LEN};
use musicvault_core::Gateway;
use std::sync::Arc;

/// How many raga names the combined search shows.
pub const RAGA_SEARCH_LIMIT: usize = 3;

/// Search raga names and bandish titles together.
pub async fn run(term: &str, limit: usize, gateway: Arc<dyn Gateway>) -> Result<()> {
    if term.trim().chars().count() < MIN_SEARCH_LEN {
        println!("Type at least {} characters to search.", MIN_SEARCH_LEN);
        return Ok(());
    }

    let ragas = RagaCatalog::new(gateway.clone())
        .search_names(term, RAGA_SEARCH_LIMIT)
        .await?;
    let bandishes = BandishCatalog::new(gateway)
        .search_titles(term, limit)
        .await?;

    if ragas.is_empty() && bandishes.is_empty() {
        println!("No matches for '{}'.", term.trim());
        return Ok(());
    }

    if !ragas.is_empty() {
        println!("Ragas:");
        for raga in &ragas {
            println!("{}  {:<20} {}", raga.id, raga.name, raga.thaat);
        }
    }
    if !bandishes.is_empty() {
        if !ragas.is_empty() {
            println!();
        }
        println!("Bandishes:");
        super::bandish::print_listings(&bandishes);
    }

    Ok(())
}

