//! Application configuration.
//!
//! # Responsibility
//! - Select the storage backend and database location at startup.
//! - Carry logging options for `init_logging`.
//!
//! # Invariants
//! - Unknown keys and unknown backend names are rejected at parse time.
//! - A missing `db_path` means an in-memory SQLite database.

use crate::logging::{default_log_level, normalize_level};
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidValue { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Repository implementation wired into the service at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// `MemoryItemRepository`; contents vanish with the process.
    #[default]
    Memory,
    /// `SqliteItemRepository`.
    Sqlite,
    /// `SqliteSessionItemRepository`.
    SqliteSession,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::SqliteSession => "sqlite_session",
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "sqlite_session" => Ok(Self::SqliteSession),
            other => Err(ConfigError::InvalidValue {
                field: "backend",
                message: format!(
                    "unknown backend `{other}`; expected memory|sqlite|sqlite_session"
                ),
            }),
        }
    }
}

/// Startup configuration, usually read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backend: StorageBackend,
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Logging stays disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Configured level, or the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(level) = self.log_level.as_deref() {
            normalize_level(level).map_err(|message| ConfigError::InvalidValue {
                field: "log_level",
                message,
            })?;
        }

        if let Some(dir) = self.log_dir.as_deref() {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "log_dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        if self.backend == StorageBackend::Memory && self.db_path.is_some() {
            warn!("event=config_load module=config status=warn reason=db_path_ignored backend=memory");
        }

        Ok(())
    }
}
