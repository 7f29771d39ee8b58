//! Repository contract shared by the relational and flat-storage backends.
//!
//! # Responsibility
//! - Fix the operation set the storage facade routes to.
//! - Carry one error type for every backend failure.
//!
//! # Invariants
//! - Reads take `&self`, writes take `&mut self`: writes to one backend are
//!   serialized by the borrow checker.
//! - `get_book` signals absence with `Ok(None)`, never an error.
//! - `word_count` in `list_books` is a live recount.
//! - Update/delete of a missing id is a no-op.

use crate::config::BackendKind;
#[cfg(feature = "relational")]
use crate::db::DbError;
use crate::kv::KvError;
use crate::model::word::{NewWord, WordId, WordPatch};
use crate::model::wordbook::{
    NewWordBook, WordBookDetail, WordBookId, WordBookPatch, WordBookSummary,
};
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of one storage operation, surfaced to the caller.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    #[cfg(feature = "relational")]
    Db(DbError),
    Kv(KvError),
    /// A word write targeted a book that does not exist.
    BookNotFound(WordBookId),
    /// An operation ran before `prepare` opened the store.
    NotInitialized,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            #[cfg(feature = "relational")]
            Self::Db(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::BookNotFound(id) => write!(f, "word book not found: {id}"),
            Self::NotInitialized => write!(f, "storage backend is not initialized"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            #[cfg(feature = "relational")]
            Self::Db(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::BookNotFound(_) | Self::NotInitialized => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(feature = "relational")]
impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

#[cfg(feature = "relational")]
impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Emptiness signal reported by `prepare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing has been stored yet; default data should be seeded.
    Empty,
    Populated,
}

/// Operations every storage backend provides.
pub trait WordBookRepository {
    fn backend_kind(&self) -> BackendKind;

    /// Makes the store ready for reads and writes and reports whether it
    /// still needs seeding. Safe to call more than once.
    fn prepare(&mut self) -> RepoResult<StoreState>;

    fn count_books(&self) -> RepoResult<usize>;

    /// Lists books most recent first, each with its live word count.
    fn list_books(&self) -> RepoResult<Vec<WordBookSummary>>;

    fn get_book(&self, id: WordBookId) -> RepoResult<Option<WordBookDetail>>;

    fn add_book(&mut self, book: &NewWordBook) -> RepoResult<WordBookId>;

    fn update_book(&mut self, patch: &WordBookPatch) -> RepoResult<()>;

    /// Deletes a book and every word it owns.
    fn delete_book(&mut self, id: WordBookId) -> RepoResult<()>;

    fn add_word(&mut self, book_id: WordBookId, word: &NewWord) -> RepoResult<WordId>;

    fn update_word(&mut self, patch: &WordPatch) -> RepoResult<()>;

    fn delete_word(&mut self, book_id: WordBookId, word_id: WordId) -> RepoResult<()>;
}
