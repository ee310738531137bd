//! Application configuration.
//!
//! # Responsibility
//! - Describe every runtime setting as one explicit `AppConfig` value.
//! - Load settings from a JSON file and overlay environment overrides.
//!
//! # Invariants
//! - `db.path` is mandatory; every other setting has a default.
//! - Environment lookups are injected, so resolution never touches
//!   process-wide state unless the caller passes `std::env::var`.

use crate::db::StoreConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "PAGEKIT_DB_PATH";
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "PAGEKIT_DB_BUSY_TIMEOUT_MS";
pub const ENV_TEMPLATE_PATH: &str = "PAGEKIT_TEMPLATE_PATH";
pub const ENV_LOG_LEVEL: &str = "PAGEKIT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PAGEKIT_LOG_DIR";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    /// A mandatory setting was supplied neither by file nor by environment.
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Missing(_) | Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub db: DbSettings,
    #[serde(default)]
    pub template: TemplateSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSettings {
    pub path: PathBuf,
    #[serde(default)]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: Option<String>,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

/// Partially specified config used while layering sources.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    db: Option<PartialDbSettings>,
    #[serde(default)]
    template: TemplateSettings,
    #[serde(default)]
    log: LogSettings,
}

#[derive(Debug, Default, Deserialize)]
struct PartialDbSettings {
    path: Option<PathBuf>,
    busy_timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Config with only the database path set.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbSettings {
                path: db_path.into(),
                busy_timeout_ms: 0,
            },
            template: TemplateSettings::default(),
            log: LogSettings::default(),
        }
    }

    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = read_file(path.as_ref())?;
        Self::from_json_str(&source)
    }

    /// Builds the config from an optional file, then applies environment
    /// overrides from `lookup`.
    ///
    /// # Errors
    /// - `ConfigError::Missing("db.path")` when neither source names a
    ///   database.
    pub fn resolve<F>(file: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let partial = match file {
            Some(path) => serde_json::from_str::<PartialConfig>(&read_file(path)?)?,
            None => PartialConfig::default(),
        };
        let db = partial.db.unwrap_or_default();

        let path = lookup(ENV_DB_PATH)
            .map(PathBuf::from)
            .or(db.path)
            .ok_or(ConfigError::Missing("db.path"))?;
        let busy_timeout_ms = match lookup(ENV_DB_BUSY_TIMEOUT_MS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: ENV_DB_BUSY_TIMEOUT_MS,
                value: raw,
            })?,
            None => db.busy_timeout_ms.unwrap_or(0),
        };

        Ok(Self {
            db: DbSettings {
                path,
                busy_timeout_ms,
            },
            template: TemplateSettings {
                path: lookup(ENV_TEMPLATE_PATH)
                    .map(PathBuf::from)
                    .or(partial.template.path),
            },
            log: LogSettings {
                level: lookup(ENV_LOG_LEVEL).or(partial.log.level),
                dir: lookup(ENV_LOG_DIR).map(PathBuf::from).or(partial.log.dir),
            },
        })
    }

    /// Connection settings for `RecordStore::from_config`.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.db.path.clone())
            .with_busy_timeout(Duration::from_millis(self.db.busy_timeout_ms))
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DB_BUSY_TIMEOUT_MS, ENV_DB_PATH};
    use std::path::PathBuf;
    use std::time::Duration;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_minimal_json() {
        let config = AppConfig::from_json_str(r#"{"db": {"path": "site.db"}}"#).unwrap();
        assert_eq!(config, AppConfig::new("site.db"));
    }

    #[test]
    fn resolve_without_any_db_path_fails() {
        let err = AppConfig::resolve(None, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("db.path")));
    }

    #[test]
    fn resolve_uses_env_when_no_file() {
        let config = AppConfig::resolve(None, |key| {
            (key == ENV_DB_PATH).then(|| "/tmp/env.db".to_string())
        })
        .unwrap();
        assert_eq!(config.db.path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.store_config().busy_timeout, Duration::ZERO);
    }

    #[test]
    fn resolve_rejects_non_numeric_busy_timeout() {
        let err = AppConfig::resolve(None, |key| match key {
            ENV_DB_PATH => Some("x.db".to_string()),
            ENV_DB_BUSY_TIMEOUT_MS => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { value, .. } if value == "soon"));
    }
}
