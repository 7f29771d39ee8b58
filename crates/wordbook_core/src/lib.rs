//! Word book persistence core.
//!
//! One storage facade over two substrates: embedded SQLite and key-scoped
//! flat storage. Both backends keep the same observable contract.

pub mod config;
#[cfg(feature = "relational")]
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;

pub use config::{BackendKind, ConfigError, StorageConfig};
pub use kv::{FileKvStore, KeyValueStore, KvError, KvResult, MemoryKvStore};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::word::{NewWord, Word, WordId, WordPatch};
pub use model::wordbook::{
    Difficulty, NewWordBook, WordBook, WordBookDetail, WordBookId, WordBookPatch, WordBookSummary,
};
pub use model::ValidationError;
pub use repo::flat_repo::FlatWordBookRepository;
#[cfg(feature = "relational")]
pub use repo::sqlite_repo::SqliteWordBookRepository;
pub use repo::wordbook_repo::{RepoError, RepoResult, StoreState, WordBookRepository};
pub use service::seed::seed_default_data;
pub use service::storage_service::{StorageError, StorageResult, WordBookStorage};
pub use settings::ThemeSettings;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
