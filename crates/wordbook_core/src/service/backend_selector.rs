//! Picks and constructs the storage backend for this process.

use crate::config::{BackendKind, StorageConfig};
use crate::kv::FileKvStore;
use crate::repo::flat_repo::FlatWordBookRepository;
#[cfg(feature = "relational")]
use crate::repo::sqlite_repo::SqliteWordBookRepository;
use crate::repo::wordbook_repo::{RepoError, WordBookRepository};
use crate::service::storage_service::{StorageError, StorageResult};
use log::info;

/// Resolves the configured backend kind against what this build carries.
///
/// # Errors
/// - `StorageError::BackendUnavailable` when the requested backend was not
///   compiled in.
pub fn resolve_backend_kind(config: &StorageConfig) -> StorageResult<BackendKind> {
    let kind = config.backend.unwrap_or_else(BackendKind::platform_default);
    if !kind.is_available() {
        return Err(StorageError::BackendUnavailable(kind));
    }
    Ok(kind)
}

/// Constructs an unprepared backend for `config`.
///
/// Creates the data directory; opening the store itself is left to
/// `WordBookRepository::prepare`.
pub fn select_backend(config: &StorageConfig) -> StorageResult<Box<dyn WordBookRepository>> {
    let kind = resolve_backend_kind(config)?;
    std::fs::create_dir_all(config.data_dir()).map_err(StorageError::DataDir)?;

    info!(
        "event=backend_select module=service status=ok backend={} data_dir={}",
        kind,
        config.data_dir().display()
    );

    match kind {
        #[cfg(feature = "relational")]
        BackendKind::Relational => Ok(Box::new(SqliteWordBookRepository::new(
            config.database_path(),
        ))),
        #[cfg(not(feature = "relational"))]
        BackendKind::Relational => Err(StorageError::BackendUnavailable(kind)),
        BackendKind::FlatStorage => {
            let store = FileKvStore::open(config.flat_store_dir()).map_err(RepoError::from)?;
            Ok(Box::new(FlatWordBookRepository::new(store)))
        }
    }
}
