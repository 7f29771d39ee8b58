//! Domain model for word books and their word pairs.
//!
//! # Responsibility
//! - Define the records shared by every storage backend.
//! - Validate caller input before any backend persists it.
//!
//! # Invariants
//! - Every `Word` belongs to exactly one `WordBook` via `book_id`.
//! - `word_count` on a summary is computed at read time, never stored.

pub mod word;
pub mod wordbook;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Input validation failures shared by book and word writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankTitle,
    BlankChinese,
    BlankEnglish,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "word book title must not be blank"),
            Self::BlankChinese => write!(f, "word `chinese` term must not be blank"),
            Self::BlankEnglish => write!(f, "word `english` term must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
