//! Generic record store over a single SQLite database.
//!
//! # Responsibility
//! - Provide Execute/Fetch/Create/Read/Update/Delete/Count for any table
//!   that carries an integer `id` primary key.
//! - Convert result rows into schema-less `Record`s.
//!
//! # Invariants
//! - Every caller-supplied value is bound as a positional parameter.
//! - Table and column names are trusted identifiers and are interpolated
//!   into SQL text verbatim; they are never validated here.
//! - `update`/`delete` report that the statement executed, not that a row
//!   matched.
//! - No retries and no logging per statement; failures go to the caller.

use crate::db::{open_db_with, open_db_in_memory, QueryError, StoreConfig, StoreResult};
use crate::model::record::{Record, Value};
use rusqlite::{params_from_iter, Batch, Connection, Row, Statement};
use std::path::{Path, PathBuf};

/// Primary key of a row, stored in the `id` column.
pub type RecordId = i64;

/// SQLite-backed generic CRUD accessor.
///
/// Owns exactly one connection, released when the store is dropped.
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl RecordStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    /// - `StoreError::Connection` when the path is unusable or the file is
    ///   not a valid database.
    /// - `StoreError::Query` when another connection holds the database lock.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_config(&StoreConfig::new(path.as_ref()))
    }

    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let conn = open_db_with(config)?;
        Ok(Self {
            conn,
            path: Some(config.path.clone()),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs one or more non-parameterized statements (DDL or bulk DML).
    ///
    /// Returns the number of rows directly inserted, updated or deleted by
    /// the batch; rows written by triggers are not counted. Never use this
    /// with user-supplied values.
    pub fn execute(&self, sql: &str) -> StoreResult<usize> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut affected = 0;

        while let Some(mut stmt) = batch.next()? {
            let before = self.total_changes()?;
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
            drop(rows);

            // `changes()` keeps the last DML count across DDL statements.
            if self.total_changes()? > before {
                affected += usize::try_from(self.conn.changes()).unwrap_or(0);
            }
        }

        Ok(affected)
    }

    /// Runs a read-only statement and returns every row in result order.
    pub fn fetch(&self, sql: &str) -> StoreResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns = column_names(&stmt);
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(record_from_row(row, &columns)?);
        }

        Ok(records)
    }

    /// Inserts `data` into `table` and returns the assigned `id`.
    ///
    /// # Errors
    /// - `QueryError::EmptyPayload` when `data` has no columns.
    /// - `QueryError::Sqlite` on unknown columns or constraint violations.
    pub fn create(&self, table: &str, data: &Record) -> StoreResult<RecordId> {
        ensure_payload(table, data)?;

        let columns = data.names().collect::<Vec<_>>().join(", ");
        let placeholders = (1..=data.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders});");

        self.conn.execute(&sql, params_from_iter(data.values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Looks up the row whose `id` equals `id`.
    ///
    /// Returns `Ok(None)` when no row matches.
    pub fn read(&self, table: &str, id: RecordId) -> StoreResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {table} WHERE id = ?1;"))?;
        let columns = column_names(&stmt);
        let mut rows = stmt.query([id])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(record_from_row(row, &columns)?));
        }

        Ok(None)
    }

    /// Writes the columns of `data` into the row whose `id` equals `id`.
    ///
    /// Returns `true` once the statement has executed, including when no row
    /// matched.
    pub fn update(&self, table: &str, id: RecordId, data: &Record) -> StoreResult<bool> {
        ensure_payload(table, data)?;

        let assignments = data
            .names()
            .enumerate()
            .map(|(index, name)| format!("{name} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_index = data.len() + 1;
        let sql = format!("UPDATE {table} SET {assignments} WHERE id = ?{id_index};");

        let id_value = Value::Integer(id);
        self.conn.execute(
            &sql,
            params_from_iter(data.values().chain(std::iter::once(&id_value))),
        )?;
        Ok(true)
    }

    /// Deletes the row whose `id` equals `id`.
    ///
    /// Same contract as `update`: deleting a missing row still succeeds.
    pub fn delete(&self, table: &str, id: RecordId) -> StoreResult<bool> {
        self.conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
        Ok(true)
    }

    /// Total number of rows in `table`.
    pub fn count(&self, table: &str) -> StoreResult<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) AS count FROM {table};"),
            [],
            |row| row.get::<_, i64>("count"),
        )?;
        Ok(count)
    }

    fn total_changes(&self) -> StoreResult<i64> {
        let changes = self
            .conn
            .query_row("SELECT total_changes();", [], |row| row.get::<_, i64>(0))?;
        Ok(changes)
    }
}

fn ensure_payload(table: &str, data: &Record) -> StoreResult<()> {
    if data.is_empty() {
        return Err(QueryError::EmptyPayload {
            table: table.to_string(),
        }
        .into());
    }
    Ok(())
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn record_from_row(row: &Row<'_>, columns: &[String]) -> StoreResult<Record> {
    let mut record = Record::new();
    for (index, name) in columns.iter().enumerate() {
        record.insert(name.as_str(), Value::from(row.get_ref(index)?));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::db::{QueryError, StoreError};
    use crate::model::record::Record;

    fn store_with_page_table() -> RecordStore {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .execute(
                "CREATE TABLE page (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT,
                    content TEXT
                );",
            )
            .unwrap();
        store
    }

    #[test]
    fn in_memory_store_has_no_path() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(store.path().is_none());
    }

    #[test]
    fn execute_reports_rows_changed_by_batch() {
        let store = store_with_page_table();
        let changed = store
            .execute(
                "INSERT INTO page (title, content) VALUES ('a', 'b');
                 INSERT INTO page (title, content) VALUES ('c', 'd');",
            )
            .unwrap();
        assert_eq!(changed, 2);

        let ddl_changes = store.execute("CREATE TABLE extra (id INTEGER);").unwrap();
        assert_eq!(ddl_changes, 0);
    }

    #[test]
    fn execute_ignores_rows_written_by_triggers() {
        let store = store_with_page_table();
        store
            .execute(
                "CREATE TABLE audit (id INTEGER PRIMARY KEY, note TEXT);
                 CREATE TRIGGER page_audit AFTER INSERT ON page
                 BEGIN
                     INSERT INTO audit (note) VALUES ('inserted');
                 END;",
            )
            .unwrap();

        let changed = store
            .execute("INSERT INTO page (title, content) VALUES ('a', 'b');")
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(store.count("audit").unwrap(), 1);

        let ddl_after_dml = store.execute("CREATE TABLE later (id INTEGER);").unwrap();
        assert_eq!(ddl_after_dml, 0);
    }

    #[test]
    fn execute_tolerates_statements_returning_rows() {
        let store = store_with_page_table();
        let changed = store
            .execute("PRAGMA user_version; INSERT INTO page (title) VALUES ('x');")
            .unwrap();
        assert_eq!(changed, 1);
    }

    #[test]
    fn create_with_empty_payload_is_query_error() {
        let store = store_with_page_table();
        let err = store.create("page", &Record::new()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Query(QueryError::EmptyPayload { ref table }) if table == "page"
        ));
    }

    #[test]
    fn update_with_empty_payload_is_query_error() {
        let store = store_with_page_table();
        let err = store.update("page", 1, &Record::new()).unwrap_err();
        assert!(err.is_query());
    }

    #[test]
    fn fetch_preserves_result_column_order() {
        let store = store_with_page_table();
        store
            .create("page", &Record::new().with("title", "t").with("content", "c"))
            .unwrap();

        let rows = store.fetch("SELECT content, id FROM page;").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].names().collect::<Vec<_>>(), vec!["content", "id"]);
    }
}
