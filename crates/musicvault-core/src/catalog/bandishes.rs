use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{fetch, fetch_all, record_id, require};
use crate::error::Result;
use crate::gateway::{Gateway, Query, Table};
use crate::model::{to_record, Bandish, BandishId, NewBandish, Raga, RagaId};

/// Search terms shorter than this return nothing.
pub const MIN_SEARCH_LEN: usize = 2;

/// How many matches search-as-you-type shows.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// A bandish with the name of its raga, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandishListing {
    pub bandish: Bandish,
    pub raga_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BandishCatalog {
    gateway: Arc<dyn Gateway>,
}

impl BandishCatalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// All bandishes, newest first.
    pub async fn list(&self) -> Result<Vec<BandishListing>> {
        let bandishes = fetch_all(
            &*self.gateway,
            Table::Bandishes,
            &Query::all().descending("created_at"),
        )
        .await?;
        self.with_raga_names(bandishes).await
    }

    pub async fn get(&self, id: BandishId) -> Result<Bandish> {
        fetch(&*self.gateway, Table::Bandishes, &record_id(id)).await
    }

    pub async fn create(&self, bandish: &NewBandish) -> Result<Bandish> {
        require("title", &bandish.title)?;
        let id = self
            .gateway
            .insert(Table::Bandishes, to_record(bandish)?)
            .await?;
        log::info!("Created bandish {} ({})", bandish.title, id);
        fetch(&*self.gateway, Table::Bandishes, &id).await
    }

    pub async fn delete(&self, id: BandishId) -> Result<()> {
        self.gateway.delete(Table::Bandishes, &record_id(id)).await
    }

    /// Search-as-you-type over titles, for adding to a setlist.
    pub async fn search_titles(&self, term: &str, limit: usize) -> Result<Vec<BandishListing>> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        let bandishes = fetch_all(
            &*self.gateway,
            Table::Bandishes,
            &Query::matching(&["title"], term)
                .ascending("title")
                .limit(limit),
        )
        .await?;
        self.with_raga_names(bandishes).await
    }

    /// Case-insensitive filter over title, raga name and lyrics.
    pub async fn filter(&self, term: &str) -> Result<Vec<BandishListing>> {
        let needle = term.trim().to_lowercase();
        let listings = self.list().await?;
        if needle.is_empty() {
            return Ok(listings);
        }
        Ok(listings
            .into_iter()
            .filter(|listing| {
                listing.bandish.title.to_lowercase().contains(&needle)
                    || listing.bandish.lyrics.to_lowercase().contains(&needle)
                    || listing
                        .raga_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect())
    }

    async fn with_raga_names(&self, bandishes: Vec<Bandish>) -> Result<Vec<BandishListing>> {
        if bandishes.iter().all(|b| b.raga_id.is_none()) {
            return Ok(bandishes
                .into_iter()
                .map(|bandish| BandishListing {
                    bandish,
                    raga_name: None,
                })
                .collect());
        }

        let ragas: Vec<Raga> = fetch_all(&*self.gateway, Table::Ragas, &Query::all()).await?;
        let names: HashMap<RagaId, String> =
            ragas.into_iter().map(|raga| (raga.id, raga.name)).collect();

        Ok(bandishes
            .into_iter()
            .map(|bandish| BandishListing {
                raga_name: bandish.raga_id.and_then(|id| names.get(&id).cloned()),
                bandish,
            })
            .collect())
    }
}
