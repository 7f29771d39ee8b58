//! Word book records.
//!
//! # Invariants
//! - `id` is assigned by the backend, never by callers.
//! - `difficulty` is free text; `Difficulty` only names the known values.

use super::word::Word;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Backend-generated word book identifier.
pub type WordBookId = i64;

/// Known difficulty labels. Stored as plain text and not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Persisted word book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBook {
    pub id: WordBookId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Display-only styling token.
    #[serde(default)]
    pub gradient: Option<String>,
    #[serde(default)]
    pub progress: i64,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub create_time: i64,
}

/// Caller input for `add_book`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWordBook {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub difficulty: Option<String>,
    pub gradient: Option<String>,
}

impl NewWordBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty.as_str().to_string());
        self
    }

    pub fn with_gradient(mut self, gradient: impl Into<String>) -> Self {
        self.gradient = Some(gradient.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Materializes the stored record once the backend has assigned an id.
    pub fn into_record(self, id: WordBookId, create_time: i64) -> WordBook {
        WordBook {
            id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            difficulty: self.difficulty,
            gradient: self.gradient,
            progress: 0,
            create_time,
        }
    }
}

/// Partial update input for `update_book`.
///
/// `None` fields are left untouched. Which `Some` fields a backend honors is
/// backend-specific: the relational backend only writes title, description
/// and difficulty, the flat-storage backend writes every supplied field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBookPatch {
    pub id: WordBookId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub difficulty: Option<String>,
    pub gradient: Option<String>,
    pub progress: Option<i64>,
}

impl WordBookPatch {
    pub fn new(id: WordBookId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.title.as_deref() {
            Some(title) if is_blank(title) => Err(ValidationError::BlankTitle),
            _ => Ok(()),
        }
    }

    /// Shallow-merges every supplied field over `book`.
    pub fn merge_into(&self, book: &mut WordBook) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(description) = &self.description {
            book.description = Some(description.clone());
        }
        if let Some(icon) = &self.icon {
            book.icon = Some(icon.clone());
        }
        if let Some(difficulty) = &self.difficulty {
            book.difficulty = Some(difficulty.clone());
        }
        if let Some(gradient) = &self.gradient {
            book.gradient = Some(gradient.clone());
        }
        if let Some(progress) = self.progress {
            book.progress = progress;
        }
    }
}

/// Listing row: a book plus the live count of its words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBookSummary {
    #[serde(flatten)]
    pub book: WordBook,
    pub word_count: usize,
}

/// A book with its full word collection attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordBookDetail {
    #[serde(flatten)]
    pub book: WordBook,
    pub words: Vec<Word>,
}
