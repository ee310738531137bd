//! Page-serving use case.
//!
//! # Responsibility
//! - Resolve a page id to a row of the `page` table.
//! - Substitute a "not found" placeholder page for absent rows.
//! - Render the result through the configured template.
//!
//! # Invariants
//! - Only absence triggers the placeholder; store failures propagate.

use crate::db::StoreResult;
use crate::model::record::Record;
use crate::page::{PageResult, PageTemplate};
use crate::repo::record_store::{RecordId, RecordStore};
use log::{error, info, warn};

/// Table holding site pages.
pub const PAGE_TABLE: &str = "page";
/// Page served when the caller does not ask for one.
pub const DEFAULT_PAGE_ID: RecordId = 1;

pub const NOT_FOUND_TITLE: &str = "Page not found";
pub const NOT_FOUND_CONTENT: &str = "Oops! This page does not exist.";

/// Renders rows of the `page` table into HTML.
pub struct PageService {
    store: RecordStore,
    template: PageTemplate,
}

impl PageService {
    pub fn new(store: RecordStore, template: PageTemplate) -> Self {
        Self { store, template }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn template(&self) -> &PageTemplate {
        &self.template
    }

    /// Loads page `id`, or the placeholder page when no such row exists.
    pub fn load_page(&self, id: RecordId) -> PageResult<Record> {
        match self.store.read(PAGE_TABLE, id) {
            Ok(Some(record)) => {
                info!("event=page_load module=service status=ok page_id={id}");
                Ok(record)
            }
            Ok(None) => {
                warn!("event=page_load module=service status=not_found page_id={id}");
                Ok(not_found_page())
            }
            Err(err) => {
                error!("event=page_load module=service status=error page_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Loads and renders page `id`.
    pub fn render_page(&self, id: RecordId) -> PageResult<String> {
        let record = self.load_page(id)?;
        Ok(self.template.render(&record))
    }

    /// Releases the underlying store.
    pub fn into_store(self) -> RecordStore {
        self.store
    }
}

/// Placeholder record shown for unknown page ids.
pub fn not_found_page() -> Record {
    Record::new()
        .with("title", NOT_FOUND_TITLE)
        .with("content", NOT_FOUND_CONTENT)
}

const PAGE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS page (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);";

const SEED_PAGES: &[(&str, &str)] = &[
    ("Home", "Welcome to the site."),
    ("About", "A tiny page server backed by SQLite."),
    ("Contact", "Write to us any time."),
];

/// Creates the `page` table when missing and seeds it when empty.
///
/// Returns the number of seeded rows.
pub fn init_page_table(store: &RecordStore) -> StoreResult<usize> {
    store.execute(PAGE_TABLE_SQL)?;
    if store.count(PAGE_TABLE)? > 0 {
        return Ok(0);
    }

    for (title, content) in SEED_PAGES {
        let page = Record::new().with("title", *title).with("content", *content);
        store.create(PAGE_TABLE, &page)?;
    }
    info!(
        "event=page_seed module=service status=ok rows={}",
        SEED_PAGES.len()
    );
    Ok(SEED_PAGES.len())
}
