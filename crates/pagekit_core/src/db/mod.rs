//! SQLite connection bootstrap and store error taxonomy.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection behind a record store.
//! - Classify failures as connection-time or statement-time errors.
//!
//! # Invariants
//! - A returned connection has been probed; a file that is not a database
//!   never yields a connection.
//! - Statement failures always surface as `StoreError::Query`, never as a
//!   falsy default.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory, open_db_with, StoreConfig};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store construction and store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The database file cannot be opened, created or recognized.
    Connection {
        path: String,
        source: rusqlite::Error,
    },
    /// A statement failed at execution time.
    Query(QueryError),
}

/// Statement-level failure.
#[derive(Debug)]
pub enum QueryError {
    Sqlite(rusqlite::Error),
    /// Create/Update called without any column to write.
    EmptyPayload { table: String },
}

impl StoreError {
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection { path, source } => {
                write!(f, "cannot open database `{path}`: {source}")
            }
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection { source, .. } => Some(source),
            Self::Query(err) => Some(err),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "query failed: {err}"),
            Self::EmptyPayload { table } => {
                write!(f, "query failed: empty column payload for table `{table}`")
            }
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::EmptyPayload { .. } => None,
        }
    }
}

impl From<QueryError> for StoreError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(QueryError::Sqlite(value))
    }
}
