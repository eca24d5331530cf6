use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::gateway::{store_timestamp, Direction, Filter, Query, Record, RecordId, Table};

use super::migrations::MIGRATIONS;

/// A database connection with generic record CRUD over the repertoire tables.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Foreign-key enforcement is per connection, not per database file.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Record CRUD
impl Database {
    /// Insert a record, assigning a fresh id and `created_at`.
    pub fn insert_record(&self, table: Table, record: &Record) -> Result<RecordId> {
        insert_row(&self.conn, table, record)
    }

    /// Insert a batch of records in one transaction.
    pub fn insert_records(&self, table: Table, records: &[Record]) -> Result<Vec<RecordId>> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = records
            .iter()
            .map(|record| insert_row(&tx, table, record))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(ids)
    }

    /// Overwrite the given fields of a record.
    pub fn update_record(&self, table: Table, id: &RecordId, fields: &Record) -> Result<()> {
        check_fields(table, fields.keys().map(String::as_str))?;

        let mut assignments = Vec::new();
        let mut values = Vec::new();
        for (field, value) in fields {
            if field == "id" || field == "created_at" {
                continue;
            }
            assignments.push(format!("{} = ?", quote(field)));
            values.push(to_sql_value(value)?);
        }

        if assignments.is_empty() {
            // Nothing to write, but the caller still expects NotFound for a bad id.
            return self.get_record(table, id).map(|_| ());
        }

        values.push(SqlValue::Text(id.to_string()));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?",
            quote(table.as_str()),
            assignments.join(", ")
        );
        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        if changed == 0 {
            return Err(not_found(table, id));
        }
        Ok(())
    }

    /// Delete a record. Dependent rows follow the schema's foreign-key actions.
    pub fn delete_record(&self, table: Table, id: &RecordId) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", quote(table.as_str()));
        let changed = self.conn.execute(&sql, [id.as_str()])?;
        if changed == 0 {
            return Err(not_found(table, id));
        }
        Ok(())
    }

    /// List records matching a query.
    pub fn list_records(&self, table: Table, query: &Query) -> Result<Vec<Record>> {
        check_fields(table, query.filter.fields().into_iter())?;
        if let Some((field, _)) = &query.order_by {
            check_fields(table, std::iter::once(field.as_str()))?;
        }

        let (where_clause, mut values) = where_clause(&query.filter)?;
        let mut sql = format!(
            "SELECT {} FROM {}{}",
            select_list(table),
            quote(table.as_str()),
            where_clause
        );

        match &query.order_by {
            Some((field, direction)) => {
                let direction = match direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                };
                let field = quote(field);
                let order =
                    format!(" ORDER BY {field} IS NULL, {field} {direction}, rowid {direction}");
                sql.push_str(&order);
            }
            None => sql.push_str(" ORDER BY rowid"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            values.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(values), |row| {
                row_to_record(table, row)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Fetch a record by id.
    pub fn get_record(&self, table: Table, id: &RecordId) -> Result<Record> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_list(table),
            quote(table.as_str())
        );
        match self
            .conn
            .query_row(&sql, [id.as_str()], |row| row_to_record(table, row))
        {
            Ok(record) => Ok(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(not_found(table, id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Count the rows of a table.
    pub fn count(&self, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote(table.as_str()));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn insert_row(conn: &Connection, table: Table, record: &Record) -> Result<RecordId> {
    check_fields(table, record.keys().map(String::as_str))?;

    let id = RecordId::new(Uuid::new_v4().to_string());
    let mut columns = vec![quote("id"), quote("created_at")];
    let mut values = vec![
        SqlValue::Text(id.to_string()),
        SqlValue::Text(store_timestamp()),
    ];
    for (field, value) in record {
        if field == "id" || field == "created_at" {
            continue;
        }
        columns.push(quote(field));
        values.push(to_sql_value(value)?);
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table.as_str()),
        columns.join(", "),
        placeholders
    );
    conn.execute(&sql, rusqlite::params_from_iter(values))?;
    Ok(id)
}

fn check_fields<'a>(table: Table, mut fields: impl Iterator<Item = &'a str>) -> Result<()> {
    match fields.find(|field| !table.has_column(field)) {
        Some(field) => Err(Error::InvalidData(format!(
            "unknown field `{field}` for table {table}"
        ))),
        None => Ok(()),
    }
}

fn where_clause(filter: &Filter) -> Result<(String, Vec<SqlValue>)> {
    match filter {
        Filter::All => Ok((String::new(), Vec::new())),
        Filter::Eq { field, value } if value.is_null() => {
            Ok((format!(" WHERE {} IS NULL", quote(field)), Vec::new()))
        }
        Filter::Eq { field, value } => Ok((
            format!(" WHERE {} = ?", quote(field)),
            vec![to_sql_value(value)?],
        )),
        Filter::Contains { fields, needle } => {
            if fields.is_empty() {
                return Ok((" WHERE 0".to_string(), Vec::new()));
            }
            let pattern = format!("%{}%", escape_like(&needle.to_ascii_lowercase()));
            let clauses: Vec<String> = fields
                .iter()
                .map(|field| format!("LOWER({}) LIKE ? ESCAPE '\\'", quote(field)))
                .collect();
            let values = vec![SqlValue::Text(pattern); fields.len()];
            Ok((format!(" WHERE ({})", clauses.join(" OR ")), values))
        }
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn select_list(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(|column| quote(column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn not_found(table: Table, id: &RecordId) -> Error {
    Error::NotFound {
        entity: table.entity(),
        id: id.to_string(),
    }
}

fn to_sql_value(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().ok_or_else(|| {
                Error::InvalidData(format!("number out of range: {n}"))
            })?),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}

fn row_to_record(table: Table, row: &rusqlite::Row) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (index, column) in table.columns().iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null | ValueRef::Blob(_) => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        };
        record.insert((*column).to_string(), value);
    }
    Ok(record)
}
