//! HTML page templates.
//!
//! # Responsibility
//! - Load page templates from disk.
//! - Render a `Record` into HTML through `{{column}}` placeholders.
//!
//! # Invariants
//! - Substituted values are always HTML-escaped.
//! - Rendering never fails; missing columns render empty.

use crate::db::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod template;

pub use template::{escape_html, PageTemplate, DEFAULT_TEMPLATE};

pub type PageResult<T> = Result<T, PageError>;

#[derive(Debug)]
pub enum PageError {
    TemplateIo {
        path: PathBuf,
        source: std::io::Error,
    },
    Store(StoreError),
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateIo { path, source } => {
                write!(f, "cannot read template `{}`: {source}", path.display())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TemplateIo { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for PageError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
