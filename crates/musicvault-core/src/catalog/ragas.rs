use std::sync::Arc;

use crate::catalog::{fetch, fetch_all, record_id, require, MIN_SEARCH_LEN};
use crate::error::{Error, Result};
use crate::gateway::{Gateway, Query, Table};
use crate::model::{to_record, Bandish, NewBandish, NewRaga, Raga, RagaId};

/// A raga together with the bandishes set in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagaWithBandishes {
    pub raga: Raga,
    pub bandishes: Vec<Bandish>,
}

#[derive(Debug, Clone)]
pub struct RagaCatalog {
    gateway: Arc<dyn Gateway>,
}

impl RagaCatalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// All ragas, alphabetically.
    pub async fn list(&self) -> Result<Vec<Raga>> {
        fetch_all(&*self.gateway, Table::Ragas, &Query::all().ascending("name")).await
    }

    pub async fn get(&self, id: RagaId) -> Result<RagaWithBandishes> {
        let raga: Raga = fetch(&*self.gateway, Table::Ragas, &record_id(id)).await?;
        let bandishes = fetch_all(
            &*self.gateway,
            Table::Bandishes,
            &Query::where_eq("raga_id", id.to_string()).ascending("title"),
        )
        .await?;
        Ok(RagaWithBandishes { raga, bandishes })
    }

    pub async fn create(&self, raga: &NewRaga) -> Result<Raga> {
        require("name", &raga.name)?;
        let id = self.gateway.insert(Table::Ragas, to_record(raga)?).await?;
        log::info!("Created raga {} ({})", raga.name, id);
        fetch(&*self.gateway, Table::Ragas, &id).await
    }

    /// Delete a raga. Its bandishes stay in the archive, detached.
    pub async fn delete(&self, id: RagaId) -> Result<()> {
        self.gateway.delete(Table::Ragas, &record_id(id)).await
    }

    /// Create a raga, then add its bandishes as one batch.
    ///
    /// There is no compensating rollback: if the batch fails the raga stays
    /// created and the caller gets `Error::PartialFailure`.
    pub async fn create_with_bandishes(
        &self,
        raga: &NewRaga,
        bandishes: Vec<NewBandish>,
    ) -> Result<Raga> {
        require("name", &raga.name)?;
        for bandish in &bandishes {
            require("bandish title", &bandish.title)?;
        }

        let created = self.create(raga).await?;
        if bandishes.is_empty() {
            return Ok(created);
        }

        let count = bandishes.len();
        let records = bandishes
            .into_iter()
            .map(|bandish| to_record(&bandish.in_raga(created.id)))
            .collect::<Result<Vec<_>>>()?;

        match self.gateway.insert_many(Table::Bandishes, records).await {
            Ok(_) => {
                log::info!("Added {} bandishes to raga {}", count, created.name);
                Ok(created)
            }
            Err(e) => {
                log::error!("Raga {} created but adding bandishes failed: {}", created.id, e);
                Err(Error::PartialFailure {
                    completed: format!("raga {} ({})", created.name, created.id),
                    failed: format!("adding {count} bandishes failed: {e}"),
                })
            }
        }
    }

    /// Ragas whose name contains `term`, case-insensitively, alphabetically.
    ///
    /// Terms shorter than [`MIN_SEARCH_LEN`] return nothing without a query.
    pub async fn search_names(&self, term: &str, limit: usize) -> Result<Vec<Raga>> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        fetch_all(
            &*self.gateway,
            Table::Ragas,
            &Query::matching(&["name"], term).ascending("name").limit(limit),
        )
        .await
    }

    /// Ragas whose aroha, avroha or pakad contains the swara sequence.
    ///
    /// Matching is case-sensitive: komal and shuddha swaras differ by case.
    pub async fn search_by_swaras(&self, sequence: &str) -> Result<Vec<Raga>> {
        if sequence.trim().is_empty() {
            return Ok(Vec::new());
        }
        let ragas = self.list().await?;
        Ok(ragas
            .into_iter()
            .filter(|raga| raga.contains_swaras(sequence))
            .collect())
    }
}
