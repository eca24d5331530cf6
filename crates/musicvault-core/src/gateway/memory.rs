use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::{
    store_timestamp, Direction, Gateway, OnDelete, Query, Record, RecordId, Table,
};

/// The gateway operations, as recorded in the call journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Insert,
    InsertMany,
    Update,
    Delete,
    ListOrdered,
    GetOne,
}

impl fmt::Display for GatewayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::InsertMany => "insert_many",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ListOrdered => "list_ordered",
            Self::GetOne => "get_one",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Record>>,
    failures: HashMap<GatewayOp, usize>,
    journal: Vec<(GatewayOp, Table)>,
}

impl MemoryState {
    fn rows(&mut self, table: Table) -> &mut Vec<Record> {
        self.tables.entry(table).or_default()
    }

    /// Journal the call and consume an injected failure, if one is armed.
    fn enter(&mut self, op: GatewayOp, table: Table) -> Result<()> {
        self.journal.push((op, table));
        if let Some(remaining) = self.failures.get_mut(&op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::StoreUnavailable(format!(
                    "simulated {op} failure on {table}"
                )));
            }
        }
        Ok(())
    }

    fn position(&mut self, table: Table, id: &RecordId) -> Result<usize> {
        self.rows(table)
            .iter()
            .position(|row| row.get("id").and_then(Value::as_str) == Some(id.as_str()))
            .ok_or_else(|| Error::NotFound {
                entity: table.entity(),
                id: id.to_string(),
            })
    }

    fn insert(&mut self, table: Table, record: Record) -> Result<RecordId> {
        if let Some(field) = record.keys().find(|field| !table.has_column(field)) {
            return Err(Error::InvalidData(format!(
                "unknown field `{field}` for table {table}"
            )));
        }
        let id = RecordId::new(Uuid::new_v4().to_string());
        let mut row = Record::new();
        for column in table.columns() {
            row.insert((*column).to_string(), Value::Null);
        }
        row.extend(record);
        row.insert("id".to_string(), Value::String(id.to_string()));
        row.insert("created_at".to_string(), Value::String(store_timestamp()));
        self.rows(table).push(row);
        Ok(id)
    }

    fn delete(&mut self, table: Table, id: &RecordId) -> Result<()> {
        let index = self.position(table, id)?;
        self.rows(table).remove(index);

        for dependent in table.dependents() {
            let matches_parent = |row: &Record| {
                row.get(dependent.field).and_then(Value::as_str) == Some(id.as_str())
            };
            match dependent.action {
                OnDelete::Cascade => {
                    let doomed: Vec<RecordId> = self
                        .rows(dependent.table)
                        .iter()
                        .filter(|row| matches_parent(row))
                        .filter_map(|row| row.get("id").and_then(Value::as_str))
                        .map(RecordId::new)
                        .collect();
                    for child in doomed {
                        self.delete(dependent.table, &child)?;
                    }
                }
                OnDelete::SetNull => {
                    for row in self.rows(dependent.table).iter_mut() {
                        if matches_parent(row) {
                            row.insert(dependent.field.to_string(), Value::Null);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// In-memory [`Gateway`] for tests and demo sessions.
///
/// Keeps rows in insertion order, emulates the SQLite schema's delete
/// actions, journals every call, and can be told to fail the next N calls of
/// a given operation.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    /// Make the next `times` calls of `op` fail with `StoreUnavailable`.
    pub fn fail_next(&self, op: GatewayOp, times: usize) -> Result<()> {
        self.lock()?.failures.insert(op, times);
        Ok(())
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Result<Vec<(GatewayOp, Table)>> {
        Ok(self.lock()?.journal.clone())
    }

    /// Number of calls made of one operation.
    pub fn call_count(&self, op: GatewayOp) -> Result<usize> {
        Ok(self
            .lock()?
            .journal
            .iter()
            .filter(|(called, _)| *called == op)
            .count())
    }

    /// Forget the journal (injected failures stay armed).
    pub fn clear_calls(&self) -> Result<()> {
        self.lock()?.journal.clear();
        Ok(())
    }

    /// Insert a row directly, bypassing the journal and failure injection.
    pub fn seed(&self, table: Table, record: Record) -> Result<RecordId> {
        self.lock()?.insert(table, record)
    }

    /// Snapshot a table's rows in insertion order, bypassing the journal.
    pub fn rows(&self, table: Table) -> Result<Vec<Record>> {
        Ok(self.lock()?.rows(table).clone())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn insert(&self, table: Table, record: Record) -> Result<RecordId> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::Insert, table)?;
        state.insert(table, record)
    }

    async fn insert_many(&self, table: Table, records: Vec<Record>) -> Result<Vec<RecordId>> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::InsertMany, table)?;
        let before = state.rows(table).len();
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            match state.insert(table, record) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    state.rows(table).truncate(before);
                    return Err(e);
                }
            }
        }
        Ok(ids)
    }

    async fn update(&self, table: Table, id: &RecordId, fields: Record) -> Result<()> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::Update, table)?;
        if let Some(field) = fields.keys().find(|field| !table.has_column(field)) {
            return Err(Error::InvalidData(format!(
                "unknown field `{field}` for table {table}"
            )));
        }
        let index = state.position(table, id)?;
        let row = &mut state.rows(table)[index];
        for (field, value) in fields {
            if field != "id" && field != "created_at" {
                row.insert(field, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: &RecordId) -> Result<()> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::Delete, table)?;
        state.delete(table, id)
    }

    async fn list_ordered(&self, table: Table, query: &Query) -> Result<Vec<Record>> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::ListOrdered, table)?;
        let mut rows: Vec<(usize, Record)> = state
            .rows(table)
            .iter()
            .filter(|row| query.filter.matches(row))
            .cloned()
            .enumerate()
            .collect();

        let descending = matches!(query.order_by, Some((_, Direction::Descending)));
        rows.sort_by(|(ia, a), (ib, b)| {
            query.compare(a, b).then_with(|| {
                if descending {
                    ib.cmp(ia)
                } else {
                    ia.cmp(ib)
                }
            })
        });

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(rows.into_iter().take(limit).map(|(_, row)| row).collect())
    }

    async fn get_one(&self, table: Table, id: &RecordId) -> Result<Record> {
        let mut state = self.lock()?;
        state.enter(GatewayOp::GetOne, table)?;
        let index = state.position(table, id)?;
        Ok(state.rows(table)[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed() {
        let gateway = MemoryGateway::new();
        gateway.fail_next(GatewayOp::Insert, 1).unwrap();

        let first = gateway
            .insert(Table::Karyakrams, record(json!({"title": "A"})))
            .await;
        assert!(matches!(first, Err(Error::StoreUnavailable(_))));

        let second = gateway
            .insert(Table::Karyakrams, record(json!({"title": "A"})))
            .await;
        assert!(second.is_ok());
        assert_eq!(gateway.call_count(GatewayOp::Insert).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_detaches() {
        let gateway = MemoryGateway::new();
        let raga = gateway.seed(Table::Ragas, record(json!({"name": "Yaman"}))).unwrap();
        let bandish = gateway
            .seed(
                Table::Bandishes,
                record(json!({"title": "Eri Aali", "raga_id": raga.to_string()})),
            )
            .unwrap();
        let event = gateway
            .seed(Table::Karyakrams, record(json!({"title": "Mehfil"})))
            .unwrap();
        gateway
            .seed(
                Table::KaryakramItems,
                record(json!({
                    "karyakram_id": event.to_string(),
                    "bandish_id": bandish.to_string(),
                    "sequence_order": 1,
                })),
            )
            .unwrap();

        gateway.delete(Table::Karyakrams, &event).await.unwrap();
        assert!(gateway.rows(Table::KaryakramItems).unwrap().is_empty());

        gateway.delete(Table::Ragas, &raga).await.unwrap();
        let bandishes = gateway.rows(Table::Bandishes).unwrap();
        assert_eq!(bandishes[0]["raga_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_batch_insert_rolls_back_on_bad_record() {
        let gateway = MemoryGateway::new();
        let result = gateway
            .insert_many(
                Table::Bandishes,
                vec![record(json!({"title": "ok"})), record(json!({"bogus": 1}))],
            )
            .await;
        assert!(result.is_err());
        assert!(gateway.rows(Table::Bandishes).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_ordered_with_filter_and_limit() {
        let gateway = MemoryGateway::new();
        for order in [3, 1, 2] {
            gateway
                .seed(
                    Table::KaryakramItems,
                    record(json!({"karyakram_id": "k", "bandish_id": "b", "sequence_order": order})),
                )
                .unwrap();
        }
        gateway
            .seed(
                Table::KaryakramItems,
                record(json!({"karyakram_id": "other", "bandish_id": "b", "sequence_order": 0})),
            )
            .unwrap();

        let rows = gateway
            .list_ordered(
                Table::KaryakramItems,
                &Query::where_eq("karyakram_id", "k")
                    .ascending("sequence_order")
                    .limit(2),
            )
            .await
            .unwrap();
        let orders: Vec<_> = rows.iter().map(|r| r["sequence_order"].clone()).collect();
        assert_eq!(orders, vec![json!(1), json!(2)]);
    }
}
