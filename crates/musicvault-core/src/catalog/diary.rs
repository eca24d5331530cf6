use std::sync::Arc;

use crate::catalog::{fetch, fetch_all, require};
use crate::error::Result;
use crate::gateway::{Gateway, Query, Table};
use crate::model::{to_record, DiaryEntry, NewDiaryEntry};

#[derive(Debug, Clone)]
pub struct DiaryCatalog {
    gateway: Arc<dyn Gateway>,
}

impl DiaryCatalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, entry: &NewDiaryEntry) -> Result<DiaryEntry> {
        require("title", &entry.title)?;
        require("content", &entry.content)?;
        let id = self
            .gateway
            .insert(Table::DiaryEntries, to_record(entry)?)
            .await?;
        fetch(&*self.gateway, Table::DiaryEntries, &id).await
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Result<Vec<DiaryEntry>> {
        fetch_all(
            &*self.gateway,
            Table::DiaryEntries,
            &Query::all().descending("created_at"),
        )
        .await
    }
}
