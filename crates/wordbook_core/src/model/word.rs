//! Word pair records.

use super::wordbook::WordBookId;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Backend-generated word identifier, unique within its book's storage scope.
pub type WordId = i64;

/// Persisted source/target term pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub book_id: WordBookId,
    pub chinese: String,
    pub english: String,
}

/// Caller input for `add_word`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub chinese: String,
    pub english: String,
}

impl NewWord {
    pub fn new(chinese: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            chinese: chinese.into(),
            english: english.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.chinese) {
            return Err(ValidationError::BlankChinese);
        }
        if is_blank(&self.english) {
            return Err(ValidationError::BlankEnglish);
        }
        Ok(())
    }

    pub fn into_record(self, id: WordId, book_id: WordBookId) -> Word {
        Word {
            id,
            book_id,
            chinese: self.chinese,
            english: self.english,
        }
    }
}

/// Partial update input for `update_word`.
///
/// The flat-storage backend cannot find a word without its owning book and
/// requires `book_id`; the relational backend ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPatch {
    pub id: WordId,
    pub book_id: Option<WordBookId>,
    pub chinese: Option<String>,
    pub english: Option<String>,
}

impl WordPatch {
    pub fn new(id: WordId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn in_book(mut self, book_id: WordBookId) -> Self {
        self.book_id = Some(book_id);
        self
    }

    pub fn with_chinese(mut self, chinese: impl Into<String>) -> Self {
        self.chinese = Some(chinese.into());
        self
    }

    pub fn with_english(mut self, english: impl Into<String>) -> Self {
        self.english = Some(english.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chinese.as_deref().is_some_and(is_blank) {
            return Err(ValidationError::BlankChinese);
        }
        if self.english.as_deref().is_some_and(is_blank) {
            return Err(ValidationError::BlankEnglish);
        }
        Ok(())
    }

    pub fn merge_into(&self, word: &mut Word) {
        if let Some(chinese) = &self.chinese {
            word.chinese = chinese.clone();
        }
        if let Some(english) = &self.english {
            word.english = english.clone();
        }
    }
}
