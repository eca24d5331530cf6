//! The persistence gateway.
//!
//! Everything above this layer talks to storage through [`Gateway`]: an
//! ordered-collection store of semi-structured [`Record`]s grouped into
//! [`Table`]s. The store assigns `id` and `created_at` on insert.

pub mod memory;
pub mod query;
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

pub use memory::{GatewayOp, MemoryGateway};
pub use query::{Direction, Filter, Query};
pub use sqlite::SqliteGateway;

/// Timestamp assigned to `created_at` on insert.
///
/// Fixed-width RFC 3339 so that string ordering matches time ordering.
pub(crate) fn store_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

/// A semi-structured record: field name to primitive or string value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The store-assigned identity of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The collections the gateway knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Ragas,
    Bandishes,
    DiaryEntries,
    Karyakrams,
    KaryakramItems,
}

impl Table {
    pub const ALL: [Self; 5] = [
        Self::Ragas,
        Self::Bandishes,
        Self::DiaryEntries,
        Self::Karyakrams,
        Self::KaryakramItems,
    ];

    /// The table name in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ragas => "ragas",
            Self::Bandishes => "bandishes",
            Self::DiaryEntries => "diary_entries",
            Self::Karyakrams => "karyakrams",
            Self::KaryakramItems => "karyakram_items",
        }
    }

    /// Singular entity name, used in `NotFound` errors.
    #[must_use]
    pub const fn entity(self) -> &'static str {
        match self {
            Self::Ragas => "raga",
            Self::Bandishes => "bandish",
            Self::DiaryEntries => "diary entry",
            Self::Karyakrams => "karyakram",
            Self::KaryakramItems => "karyakram item",
        }
    }

    /// Every column of the table, store-managed ones (`id`, `created_at`) first.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Ragas => &[
                "id",
                "created_at",
                "name",
                "thaat",
                "time",
                "vadi",
                "samvadi",
                "aroha",
                "avroha",
                "pakad",
                "description",
            ],
            Self::Bandishes => &[
                "id",
                "created_at",
                "raga_id",
                "title",
                "type",
                "tempo",
                "tala",
                "composer",
                "lyrics",
                "audio_ref",
                "notation_ref",
            ],
            Self::DiaryEntries => &["id", "created_at", "title", "content", "image_ref"],
            Self::Karyakrams => &[
                "id",
                "created_at",
                "title",
                "date",
                "venue",
                "notes",
                "status",
            ],
            Self::KaryakramItems => &[
                "id",
                "created_at",
                "karyakram_id",
                "bandish_id",
                "sequence_order",
                "notes",
            ],
        }
    }

    #[must_use]
    pub fn has_column(self, field: &str) -> bool {
        self.columns().contains(&field)
    }

    /// What happens to rows of other tables when a row of this table is deleted.
    ///
    /// Mirrors the foreign-key actions declared in the SQLite schema.
    #[must_use]
    pub const fn dependents(self) -> &'static [Dependent] {
        match self {
            Self::Karyakrams => &[Dependent {
                table: Self::KaryakramItems,
                field: "karyakram_id",
                action: OnDelete::Cascade,
            }],
            Self::Ragas => &[Dependent {
                table: Self::Bandishes,
                field: "raga_id",
                action: OnDelete::SetNull,
            }],
            // Setlist rows keep pointing at a deleted bandish; readers render it as missing.
            Self::Bandishes | Self::DiaryEntries | Self::KaryakramItems => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action taken on a dependent row when its parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

/// A foreign-key relationship pointing at a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub table: Table,
    pub field: &'static str,
    pub action: OnDelete,
}

/// Generic ordered-collection store.
///
/// Implementations must handle all storage details internally and never
/// retry: failures are returned to the caller as-is.
#[async_trait]
pub trait Gateway: Send + Sync + fmt::Debug {
    /// Insert one record; returns the store-assigned id.
    async fn insert(&self, table: Table, record: Record) -> Result<RecordId>;

    /// Insert a batch of records as a single request.
    ///
    /// The batch is all-or-nothing inside the store.
    async fn insert_many(&self, table: Table, records: Vec<Record>) -> Result<Vec<RecordId>>;

    /// Overwrite the given fields of one record.
    ///
    /// Returns `Err(Error::NotFound)` if no record has that id.
    async fn update(&self, table: Table, id: &RecordId, fields: Record) -> Result<()>;

    /// Delete one record, applying the table's dependent actions.
    ///
    /// Returns `Err(Error::NotFound)` if no record has that id.
    async fn delete(&self, table: Table, id: &RecordId) -> Result<()>;

    /// List the records matching `query`, in the order it asks for.
    async fn list_ordered(&self, table: Table, query: &Query) -> Result<Vec<Record>>;

    /// Fetch one record by id.
    ///
    /// Returns `Err(Error::NotFound)` if no record has that id.
    async fn get_one(&self, table: Table, id: &RecordId) -> Result<Record>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_starts_with_store_columns() {
        for table in Table::ALL {
            assert_eq!(&table.columns()[..2], &["id", "created_at"], "{table}");
        }
    }

    #[test]
    fn test_dependents_reference_real_columns() {
        for table in Table::ALL {
            for dependent in table.dependents() {
                assert!(dependent.table.has_column(dependent.field));
            }
        }
    }

    #[test]
    fn test_record_id_serializes_transparently() {
        let id = RecordId::new("abc");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("abc"));
        assert_eq!(id.to_string(), "abc");
    }
}
