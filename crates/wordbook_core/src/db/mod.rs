//! SQLite storage bootstrap for the relational backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Create the `wordbooks`/`words` schema when absent.
//!
//! # Invariants
//! - Connections have `foreign_keys=ON` so `words.book_id` cascades.
//! - No application data is read or written before the schema exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Table creation failed; no further operation can succeed.
    SchemaCreation {
        table: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaCreation { table, source } => {
                write!(f, "failed to create table `{table}`: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaCreation { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
