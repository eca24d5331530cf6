use std::sync::Arc;

use crate::catalog::{fetch, fetch_all, record_id, require};
use crate::error::Result;
use crate::gateway::{Gateway, Query, Table};
use crate::model::{to_record, Karyakram, KaryakramId, NewKaryakram};

/// Karyakram details. Setlists are edited through `musicvault-setlist`.
#[derive(Debug, Clone)]
pub struct KaryakramCatalog {
    gateway: Arc<dyn Gateway>,
}

impl KaryakramCatalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, details: &NewKaryakram) -> Result<Karyakram> {
        require("title", &details.title)?;
        let id = self
            .gateway
            .insert(Table::Karyakrams, to_record(details)?)
            .await?;
        log::info!("Created karyakram {} ({})", details.title, id);
        fetch(&*self.gateway, Table::Karyakrams, &id).await
    }

    pub async fn update_details(&self, id: KaryakramId, details: &NewKaryakram) -> Result<Karyakram> {
        require("title", &details.title)?;
        let id = record_id(id);
        self.gateway
            .update(Table::Karyakrams, &id, to_record(details)?)
            .await?;
        fetch(&*self.gateway, Table::Karyakrams, &id).await
    }

    /// Upcoming first: ascending by date, undated events last.
    pub async fn list(&self) -> Result<Vec<Karyakram>> {
        fetch_all(&*self.gateway, Table::Karyakrams, &Query::all().ascending("date")).await
    }

    pub async fn get(&self, id: KaryakramId) -> Result<Karyakram> {
        fetch(&*self.gateway, Table::Karyakrams, &record_id(id)).await
    }

    /// Delete a karyakram together with its setlist.
    pub async fn delete(&self, id: KaryakramId) -> Result<()> {
        self.gateway.delete(Table::Karyakrams, &record_id(id)).await?;
        log::info!("Deleted karyakram {}", id);
        Ok(())
    }
}
