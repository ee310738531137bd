//! Core library for pagekit: a generic SQLite record store and the
//! page-rendering use case built on it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod page;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigResult};
pub use db::{QueryError, StoreConfig, StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::record::{Record, Value};
pub use page::{PageError, PageResult, PageTemplate};
pub use repo::record_store::{RecordId, RecordStore};
pub use service::page_service::{init_page_table, PageService, DEFAULT_PAGE_ID, PAGE_TABLE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
