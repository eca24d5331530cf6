//! Typed catalog services over the persistence gateway.
//!
//! These are the form-level operations of the archive: validate the input,
//! then make the store calls. Nothing here retries or rolls back.

pub mod bandishes;
pub mod diary;
pub mod karyakrams;
pub mod ragas;

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::gateway::{Gateway, Query, RecordId, Table};
use crate::model::from_record;

pub use bandishes::{BandishCatalog, BandishListing, DEFAULT_SEARCH_LIMIT, MIN_SEARCH_LEN};
pub use diary::DiaryCatalog;
pub use karyakrams::KaryakramCatalog;
pub use ragas::{RagaCatalog, RagaWithBandishes};

/// All catalog services sharing one gateway.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub ragas: RagaCatalog,
    pub bandishes: BandishCatalog,
    pub diary: DiaryCatalog,
    pub karyakrams: KaryakramCatalog,
}

impl Catalog {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            ragas: RagaCatalog::new(Arc::clone(&gateway)),
            bandishes: BandishCatalog::new(Arc::clone(&gateway)),
            diary: DiaryCatalog::new(Arc::clone(&gateway)),
            karyakrams: KaryakramCatalog::new(gateway),
        }
    }
}

pub(crate) fn record_id(id: impl fmt::Display) -> RecordId {
    RecordId::new(id.to_string())
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::required(field));
    }
    Ok(())
}

pub(crate) async fn fetch<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    table: Table,
    id: &RecordId,
) -> Result<T> {
    from_record(gateway.get_one(table, id).await?)
}

pub(crate) async fn fetch_all<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    table: Table,
    query: &Query,
) -> Result<Vec<T>> {
    gateway
        .list_ordered(table, query)
        .await?
        .into_iter()
        .map(from_record)
        .collect()
}
