//! Storage facade: the single surface the application calls.
//!
//! # Responsibility
//! - Select the backend once and route every operation to it.
//! - Run the initialize protocol: prepare the store, seed it when empty.
//!
//! # Invariants
//! - The facade depends only on `WordBookRepository`, never on a concrete
//!   backend.
//! - The active backend does not change for the lifetime of the facade.
//! - No operation is retried here; failures go back to the caller.

use crate::config::{BackendKind, StorageConfig};
use crate::model::word::{NewWord, WordId, WordPatch};
use crate::model::wordbook::{
    NewWordBook, WordBookDetail, WordBookId, WordBookPatch, WordBookSummary,
};
use crate::repo::wordbook_repo::{RepoError, RepoResult, StoreState, WordBookRepository};
use crate::service::backend_selector::select_backend;
use crate::service::seed::seed_default_data;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures while opening the storage facade.
#[derive(Debug)]
pub enum StorageError {
    /// The configured backend is not compiled into this build.
    BackendUnavailable(BackendKind),
    /// The data directory could not be created.
    DataDir(std::io::Error),
    /// Backend initialization failed.
    Repo(RepoError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackendUnavailable(kind) => {
                write!(f, "storage backend `{kind}` is not available in this build")
            }
            Self::DataDir(err) => write!(f, "failed to create data directory: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BackendUnavailable(_) => None,
            Self::DataDir(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StorageError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Word book storage routed to exactly one backend.
pub struct WordBookStorage {
    backend: Box<dyn WordBookRepository>,
}

impl WordBookStorage {
    /// Selects the backend for `config` and initializes it.
    ///
    /// Returns only once the store is ready to serve reads and writes.
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        let mut storage = Self::with_backend(select_backend(config)?);
        storage.initialize()?;
        Ok(storage)
    }

    /// Wraps an already constructed backend. Call `initialize` before use.
    pub fn with_backend(backend: Box<dyn WordBookRepository>) -> Self {
        Self { backend }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.backend_kind()
    }

    /// Prepares the active backend and seeds default data into an empty store.
    ///
    /// Calling it again on a populated store does not seed a second time.
    pub fn initialize(&mut self) -> RepoResult<()> {
        let started_at = Instant::now();
        let kind = self.backend.backend_kind();

        let state = match self.backend.prepare() {
            Ok(state) => state,
            Err(err) => {
                error!(
                    "event=storage_init module=service status=error backend={} duration_ms={} error={}",
                    kind,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        if state == StoreState::Empty {
            seed_default_data(self.backend.as_mut())?;
        }

        info!(
            "event=storage_init module=service status=ok backend={} seeded={} duration_ms={}",
            kind,
            state == StoreState::Empty,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Books, most recent first, with live word counts.
    pub fn list_books(&self) -> RepoResult<Vec<WordBookSummary>> {
        self.backend.list_books()
    }

    /// One book with its words, or `None` when it does not exist.
    pub fn get_book(&self, id: WordBookId) -> RepoResult<Option<WordBookDetail>> {
        self.backend.get_book(id)
    }

    pub fn add_book(&mut self, book: &NewWordBook) -> RepoResult<WordBookId> {
        self.backend.add_book(book)
    }

    /// Applies a partial update. Which fields are honored depends on the
    /// backend, see `WordBookPatch`.
    pub fn update_book(&mut self, patch: &WordBookPatch) -> RepoResult<()> {
        self.backend.update_book(patch)
    }

    /// Deletes a book and all of its words.
    pub fn delete_book(&mut self, id: WordBookId) -> RepoResult<()> {
        self.backend.delete_book(id)
    }

    pub fn add_word(&mut self, book_id: WordBookId, word: &NewWord) -> RepoResult<WordId> {
        self.backend.add_word(book_id, word)
    }

    pub fn update_word(&mut self, patch: &WordPatch) -> RepoResult<()> {
        self.backend.update_word(patch)
    }

    pub fn delete_word(&mut self, book_id: WordBookId, word_id: WordId) -> RepoResult<()> {
        self.backend.delete_word(book_id, word_id)
    }
}
