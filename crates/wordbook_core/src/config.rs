//! Storage configuration and backend kinds.
//!
//! # Responsibility
//! - Describe which substrate to use and where its files live.
//! - Parse that description from the process environment.
//!
//! # Invariants
//! - `backend = None` means "platform default", resolved once at startup.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const BACKEND_ENV: &str = "WORDBOOK_BACKEND";
pub const DATA_DIR_ENV: &str = "WORDBOOK_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "./data";
const DATABASE_FILE_NAME: &str = "word_game.db";
const FLAT_STORE_DIR_NAME: &str = "storage";

/// Storage substrate a backend runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Embedded SQLite with declared foreign keys.
    Relational,
    /// Key-scoped flat storage with hand-rolled joins and cascades.
    FlatStorage,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relational => "relational",
            Self::FlatStorage => "flat",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relational" | "sqlite" => Some(Self::Relational),
            "flat" | "flat_storage" | "kv" => Some(Self::FlatStorage),
            _ => None,
        }
    }

    /// Whether this build carries the backend.
    pub fn is_available(self) -> bool {
        match self {
            Self::Relational => cfg!(feature = "relational"),
            Self::FlatStorage => true,
        }
    }

    /// Relational when SQLite is compiled in, flat storage otherwise.
    pub fn platform_default() -> Self {
        if Self::Relational.is_available() {
            Self::Relational
        } else {
            Self::FlatStorage
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    EmptyDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => write!(
                f,
                "unsupported backend `{value}`; expected relational|flat"
            ),
            Self::EmptyDataDir => write!(f, "{DATA_DIR_ENV} cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Process-scoped storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Explicit backend, or `None` for the platform default.
    pub backend: Option<BackendKind>,
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: None,
            data_dir: data_dir.into(),
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Reads `WORDBOOK_BACKEND` and `WORDBOOK_DATA_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup(BACKEND_ENV).filter(|value| !value.trim().is_empty()) {
            Some(value) => Some(
                BackendKind::parse(&value).ok_or(ConfigError::UnknownBackend(value))?,
            ),
            None => None,
        };

        let data_dir = match lookup(DATA_DIR_ENV) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDataDir),
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        Ok(Self { backend, data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// SQLite database file used by the relational backend.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    /// Directory holding the flat-storage key files.
    pub fn flat_store_dir(&self) -> PathBuf {
        self.data_dir.join(FLAT_STORE_DIR_NAME)
    }
}
