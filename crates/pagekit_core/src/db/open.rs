//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and busy handling.
//! - Probe the database header before handing the connection out.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Busy timeout defaults to zero, so lock contention is reported instead
//!   of retried.

use super::{StoreError, StoreResult};
use log::{error, info};
use super::QueryError;
use rusqlite::{Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MEMORY_PATH_LABEL: &str = ":memory:";

/// Connection settings for one record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; created when absent.
    pub path: PathBuf,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::ZERO,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Opens (or creates) a SQLite database file with default settings.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    open_db_with(&StoreConfig::new(path.as_ref()))
}

/// Opens (or creates) a SQLite database file.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
///
/// # Errors
/// - `StoreError::Connection` when the path cannot be opened or the file is
///   not a valid database.
/// - `StoreError::Query` when the file is locked by another connection.
pub fn open_db_with(config: &StoreConfig) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let label = config.path.display().to_string();
    info!("event=db_open module=db status=start mode=file");

    let result = Connection::open(&config.path)
        .and_then(|conn| bootstrap_connection(conn, config.busy_timeout));
    finish_open(result, label, "file", started_at)
}

/// Opens a private in-memory SQLite database.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .and_then(|conn| bootstrap_connection(conn, Duration::ZERO));
    finish_open(result, MEMORY_PATH_LABEL.to_string(), "memory", started_at)
}

fn finish_open(
    result: rusqlite::Result<Connection>,
    path: String,
    mode: &str,
    started_at: Instant,
) -> StoreResult<Connection> {
    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(source) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                source
            );
            if is_lock_contention(&source) {
                return Err(StoreError::Query(QueryError::Sqlite(source)));
            }
            Err(StoreError::Connection { path, source })
        }
    }
}

// A locked database is a usable path; contention is a statement failure.
fn is_lock_contention(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

fn bootstrap_connection(conn: Connection, busy_timeout: Duration) -> rusqlite::Result<Connection> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    // Reads the header; a non-database file fails here rather than on first use.
    conn.query_row("SELECT COUNT(*) FROM sqlite_master;", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(conn)
}
