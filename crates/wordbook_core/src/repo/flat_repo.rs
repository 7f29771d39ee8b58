//! Flat-storage word book repository.
//!
//! # Responsibility
//! - Emulate the relational model on a key-scoped store.
//! - Hand-roll the joins (word counts) and the cascade delete.
//!
//! # Key layout
//! - `wordbooks_db`: every book, newest first, as one JSON array.
//! - `words_db_<bookId>`: one JSON array of words per book.
//! - `wordbooks_id_seq`: last issued id.
//!
//! # Invariants
//! - Every read or write of a collection is a whole-value round-trip.
//! - Ids are `max(now_ms, last_id + 1)`: unique and increasing.
//! - A crash between the two steps of `delete_book` can leave a stale
//!   words key behind; nothing repairs it, but ids are never reused so it
//!   is never reattached to another book.

use crate::config::BackendKind;
use crate::kv::{read_json, write_json, KeyValueStore};
use crate::model::now_epoch_ms;
use crate::model::word::{NewWord, Word, WordId, WordPatch};
use crate::model::wordbook::{
    NewWordBook, WordBook, WordBookDetail, WordBookId, WordBookPatch, WordBookSummary,
};
use crate::repo::wordbook_repo::{RepoError, RepoResult, StoreState, WordBookRepository};
use log::{debug, warn};

const BOOKS_KEY: &str = "wordbooks_db";
const ID_SEQ_KEY: &str = "wordbooks_id_seq";

fn words_key(book_id: WordBookId) -> String {
    format!("words_db_{book_id}")
}

/// Flat-storage backend generic over the key/value substrate.
pub struct FlatWordBookRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> FlatWordBookRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_books(&self) -> RepoResult<Vec<WordBook>> {
        Ok(read_json(&self.store, BOOKS_KEY)?.unwrap_or_default())
    }

    fn save_books(&mut self, books: &[WordBook]) -> RepoResult<()> {
        write_json(&mut self.store, BOOKS_KEY, books)?;
        Ok(())
    }

    fn load_words(&self, book_id: WordBookId) -> RepoResult<Vec<Word>> {
        Ok(read_json(&self.store, &words_key(book_id))?.unwrap_or_default())
    }

    fn save_words(&mut self, book_id: WordBookId, words: &[Word]) -> RepoResult<()> {
        write_json(&mut self.store, &words_key(book_id), words)?;
        Ok(())
    }

    fn book_exists(&self, book_id: WordBookId) -> RepoResult<bool> {
        Ok(self.load_books()?.iter().any(|book| book.id == book_id))
    }

    fn next_id(&mut self) -> RepoResult<i64> {
        let last: i64 = read_json(&self.store, ID_SEQ_KEY)?.unwrap_or(0);
        let id = now_epoch_ms().max(last + 1);
        write_json(&mut self.store, ID_SEQ_KEY, &id)?;
        Ok(id)
    }
}

impl<S: KeyValueStore> WordBookRepository for FlatWordBookRepository<S> {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::FlatStorage
    }

    fn prepare(&mut self) -> RepoResult<StoreState> {
        // No table to count: a missing index key is the emptiness signal.
        if self.store.contains(BOOKS_KEY)? {
            Ok(StoreState::Populated)
        } else {
            Ok(StoreState::Empty)
        }
    }

    fn count_books(&self) -> RepoResult<usize> {
        Ok(self.load_books()?.len())
    }

    fn list_books(&self) -> RepoResult<Vec<WordBookSummary>> {
        self.load_books()?
            .into_iter()
            .map(|book| {
                let word_count = self.load_words(book.id)?.len();
                Ok(WordBookSummary { book, word_count })
            })
            .collect()
    }

    fn get_book(&self, id: WordBookId) -> RepoResult<Option<WordBookDetail>> {
        let Some(book) = self.load_books()?.into_iter().find(|book| book.id == id) else {
            return Ok(None);
        };
        let words = self.load_words(id)?;
        Ok(Some(WordBookDetail { book, words }))
    }

    fn add_book(&mut self, book: &NewWordBook) -> RepoResult<WordBookId> {
        book.validate()?;

        let mut books = self.load_books()?;
        let id = self.next_id()?;
        books.insert(0, book.clone().into_record(id, now_epoch_ms()));
        self.save_books(&books)?;
        self.save_words(id, &[])?;

        debug!("event=book_add module=repo backend=flat status=ok book_id={id}");
        Ok(id)
    }

    fn update_book(&mut self, patch: &WordBookPatch) -> RepoResult<()> {
        patch.validate()?;

        let mut books = self.load_books()?;
        let Some(book) = books.iter_mut().find(|book| book.id == patch.id) else {
            debug!(
                "event=book_update module=repo backend=flat status=noop book_id={}",
                patch.id
            );
            return Ok(());
        };
        patch.merge_into(book);
        self.save_books(&books)
    }

    fn delete_book(&mut self, id: WordBookId) -> RepoResult<()> {
        let mut books = self.load_books()?;
        books.retain(|book| book.id != id);
        self.save_books(&books)?;
        self.store.remove(&words_key(id))?;

        debug!("event=book_delete module=repo backend=flat status=ok book_id={id}");
        Ok(())
    }

    fn add_word(&mut self, book_id: WordBookId, word: &NewWord) -> RepoResult<WordId> {
        word.validate()?;
        if !self.book_exists(book_id)? {
            warn!(
                "event=word_add module=repo backend=flat status=rejected reason=book_not_found book_id={}",
                book_id
            );
            return Err(RepoError::BookNotFound(book_id));
        }

        let mut words = self.load_words(book_id)?;
        let id = self.next_id()?;
        words.push(word.clone().into_record(id, book_id));
        self.save_words(book_id, &words)?;
        Ok(id)
    }

    fn update_word(&mut self, patch: &WordPatch) -> RepoResult<()> {
        patch.validate()?;

        let Some(book_id) = patch.book_id else {
            // No reverse index from word id to book: refuse and carry on.
            warn!(
                "event=word_update module=repo backend=flat status=skipped reason=missing_book_id word_id={}",
                patch.id
            );
            return Ok(());
        };

        let mut words = self.load_words(book_id)?;
        let Some(word) = words.iter_mut().find(|word| word.id == patch.id) else {
            debug!(
                "event=word_update module=repo backend=flat status=noop book_id={} word_id={}",
                book_id, patch.id
            );
            return Ok(());
        };
        patch.merge_into(word);
        self.save_words(book_id, &words)
    }

    fn delete_word(&mut self, book_id: WordBookId, word_id: WordId) -> RepoResult<()> {
        let mut words = self.load_words(book_id)?;
        let before = words.len();
        words.retain(|word| word.id != word_id);
        if words.len() == before {
            return Ok(());
        }
        self.save_words(book_id, &words)
    }
}
