use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::gateway::{Gateway, Query, Record, RecordId, Table};
use crate::schema::Database;

/// [`Gateway`] backed by a local SQLite database.
///
/// rusqlite is synchronous, so every call runs on tokio's blocking pool. The
/// connection lock is taken inside the blocking task and never held across
/// an `.await`.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    db: Arc<Mutex<Database>>,
}

impl SqliteGateway {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Count the rows of a table.
    pub async fn count(&self, table: Table) -> Result<usize> {
        self.with_db(move |db| db.count(table)).await
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| Error::StoreUnavailable("database lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::StoreUnavailable(format!("store task failed: {e}")))?
    }
}

#[async_trait]
impl Gateway for SqliteGateway {
    async fn insert(&self, table: Table, record: Record) -> Result<RecordId> {
        let id = self
            .with_db(move |db| db.insert_record(table, &record))
            .await?;
        log::debug!("Inserted {} {}", table.entity(), id);
        Ok(id)
    }

    async fn insert_many(&self, table: Table, records: Vec<Record>) -> Result<Vec<RecordId>> {
        let ids = self
            .with_db(move |db| db.insert_records(table, &records))
            .await?;
        log::debug!("Inserted {} rows into {}", ids.len(), table);
        Ok(ids)
    }

    async fn update(&self, table: Table, id: &RecordId, fields: Record) -> Result<()> {
        let id = id.clone();
        self.with_db(move |db| db.update_record(table, &id, &fields))
            .await
    }

    async fn delete(&self, table: Table, id: &RecordId) -> Result<()> {
        let id = id.clone();
        self.with_db(move |db| db.delete_record(table, &id)).await?;
        log::debug!("Deleted {} from {}", table.entity(), table);
        Ok(())
    }

    async fn list_ordered(&self, table: Table, query: &Query) -> Result<Vec<Record>> {
        let query = query.clone();
        self.with_db(move |db| db.list_records(table, &query)).await
    }

    async fn get_one(&self, table: Table, id: &RecordId) -> Result<Record> {
        let id = id.clone();
        self.with_db(move |db| db.get_record(table, &id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_one() {
        let gateway = SqliteGateway::open_in_memory().unwrap();
        let id = gateway
            .insert(Table::DiaryEntries, record(json!({"title": "Riyaz", "content": "Kharaj"})))
            .await
            .unwrap();

        let fetched = gateway.get_one(Table::DiaryEntries, &id).await.unwrap();
        assert_eq!(fetched["title"], "Riyaz");
        assert_eq!(gateway.count(Table::DiaryEntries).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_one_missing_is_not_found() {
        let gateway = SqliteGateway::open_in_memory().unwrap();
        let err = gateway
            .get_one(Table::Karyakrams, &RecordId::new("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_descending_ties_show_latest_insert_first() {
        let gateway = SqliteGateway::open_in_memory().unwrap();
        for title in ["first", "second"] {
            gateway
                .insert(Table::Bandishes, record(json!({"title": title, "tala": "same"})))
                .await
                .unwrap();
        }
        let rows = gateway
            .list_ordered(Table::Bandishes, &Query::all().descending("tala"))
            .await
            .unwrap();
        assert_eq!(rows[0]["title"], "second");
    }
}
