//! SQLite-backed word book repository.
//!
//! # Responsibility
//! - Map the repository contract onto the `wordbooks`/`words` tables.
//! - Log every failed statement with its SQL before propagating it.
//!
//! # Invariants
//! - Books list newest first (`ORDER BY id DESC`).
//! - `update_book` writes only `title`, `description`, `difficulty`.
//! - `delete_book` removes owned words and the book in one transaction; the
//!   declared `ON DELETE CASCADE` backs it up.
//! - `delete_word` matches on the word id alone.

use crate::config::BackendKind;
use crate::db::schema::{compact_sql, ensure_schema};
use crate::db::{open_db, open_db_in_memory};
use crate::model::now_epoch_ms;
use crate::model::word::{NewWord, Word, WordId, WordPatch};
use crate::model::wordbook::{
    NewWordBook, WordBook, WordBookDetail, WordBookId, WordBookPatch, WordBookSummary,
};
use crate::repo::wordbook_repo::{RepoError, RepoResult, StoreState, WordBookRepository};
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;

const LIST_BOOKS_SQL: &str = "SELECT
    b.id AS id,
    b.title AS title,
    b.description AS description,
    b.icon AS icon,
    b.difficulty AS difficulty,
    b.progress AS progress,
    b.gradient AS gradient,
    b.create_time AS create_time,
    (SELECT count(*) FROM words w WHERE w.book_id = b.id) AS word_count
FROM wordbooks b
ORDER BY b.id DESC;";

const SELECT_BOOK_SQL: &str = "SELECT
    id,
    title,
    description,
    icon,
    difficulty,
    progress,
    gradient,
    create_time
FROM wordbooks
WHERE id = ?1;";

const COUNT_BOOKS_SQL: &str = "SELECT count(*) FROM wordbooks;";

const INSERT_BOOK_SQL: &str = "INSERT INTO wordbooks (
    title,
    description,
    icon,
    difficulty,
    gradient,
    create_time
) VALUES (?1, ?2, ?3, ?4, ?5, ?6);";

const UPDATE_BOOK_SQL: &str = "UPDATE wordbooks
SET
    title = COALESCE(?2, title),
    description = COALESCE(?3, description),
    difficulty = COALESCE(?4, difficulty)
WHERE id = ?1;";

const DELETE_BOOK_WORDS_SQL: &str = "DELETE FROM words WHERE book_id = ?1;";
const DELETE_BOOK_SQL: &str = "DELETE FROM wordbooks WHERE id = ?1;";

const BOOK_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM wordbooks WHERE id = ?1);";

const SELECT_WORDS_SQL: &str = "SELECT id, book_id, chinese, english
FROM words
WHERE book_id = ?1
ORDER BY id ASC;";

const INSERT_WORD_SQL: &str = "INSERT INTO words (book_id, chinese, english) VALUES (?1, ?2, ?3);";

const UPDATE_WORD_SQL: &str = "UPDATE words
SET
    chinese = COALESCE(?2, chinese),
    english = COALESCE(?3, english)
WHERE id = ?1;";

const DELETE_WORD_SQL: &str = "DELETE FROM words WHERE id = ?1;";

#[derive(Debug, Clone, PartialEq, Eq)]
enum DbLocation {
    File(PathBuf),
    Memory,
}

/// Relational backend owning one SQLite connection for the process lifetime.
pub struct SqliteWordBookRepository {
    location: DbLocation,
    conn: Option<Connection>,
}

impl SqliteWordBookRepository {
    /// Creates a repository for a database file. Nothing is opened until
    /// `prepare`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DbLocation::File(path.into()),
            conn: None,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            conn: None,
        }
    }

    /// Returns the open connection.
    pub fn connection(&self) -> RepoResult<&Connection> {
        self.conn.as_ref().ok_or(RepoError::NotInitialized)
    }

    fn connection_mut(&mut self) -> RepoResult<&mut Connection> {
        self.conn.as_mut().ok_or(RepoError::NotInitialized)
    }

    fn open_connection(&self) -> RepoResult<Connection> {
        let conn = match &self.location {
            DbLocation::File(path) => open_db(path)?,
            DbLocation::Memory => open_db_in_memory()?,
        };
        Ok(conn)
    }
}

impl WordBookRepository for SqliteWordBookRepository {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn prepare(&mut self) -> RepoResult<StoreState> {
        if self.conn.is_some() {
            // Recovery path: a repeated open is not fatal, schema setup still runs.
            warn!("event=db_open module=repo status=skipped reason=already_open");
        } else {
            let conn = self.open_connection()?;
            self.conn = Some(conn);
        }

        ensure_schema(self.connection()?)?;

        if self.count_books()? == 0 {
            Ok(StoreState::Empty)
        } else {
            Ok(StoreState::Populated)
        }
    }

    fn count_books(&self) -> RepoResult<usize> {
        let conn = self.connection()?;
        let count = logged(
            "count_books",
            COUNT_BOOKS_SQL,
            conn.query_row(COUNT_BOOKS_SQL, [], |row| row.get::<_, i64>(0)),
        )?;
        Ok(count_to_usize(count))
    }

    fn list_books(&self) -> RepoResult<Vec<WordBookSummary>> {
        let conn = self.connection()?;
        logged("list_books", LIST_BOOKS_SQL, query_summaries(conn))
    }

    fn get_book(&self, id: WordBookId) -> RepoResult<Option<WordBookDetail>> {
        let conn = self.connection()?;
        let book = logged(
            "get_book",
            SELECT_BOOK_SQL,
            conn.query_row(SELECT_BOOK_SQL, [id], parse_book_row).optional(),
        )?;

        let Some(book) = book else {
            return Ok(None);
        };

        let words = logged("get_book", SELECT_WORDS_SQL, query_words(conn, id))?;
        Ok(Some(WordBookDetail { book, words }))
    }

    fn add_book(&mut self, book: &NewWordBook) -> RepoResult<WordBookId> {
        book.validate()?;
        let conn = self.connection()?;

        logged(
            "add_book",
            INSERT_BOOK_SQL,
            conn.execute(
                INSERT_BOOK_SQL,
                params![
                    book.title.as_str(),
                    book.description.as_deref(),
                    book.icon.as_deref(),
                    book.difficulty.as_deref(),
                    book.gradient.as_deref(),
                    now_epoch_ms(),
                ],
            ),
        )?;

        let id = conn.last_insert_rowid();
        debug!("event=book_add module=repo backend=relational status=ok book_id={id}");
        Ok(id)
    }

    fn update_book(&mut self, patch: &WordBookPatch) -> RepoResult<()> {
        patch.validate()?;
        let conn = self.connection()?;

        // icon, gradient and progress are intentionally not written here.
        let changed = logged(
            "update_book",
            UPDATE_BOOK_SQL,
            conn.execute(
                UPDATE_BOOK_SQL,
                params![
                    patch.id,
                    patch.title.as_deref(),
                    patch.description.as_deref(),
                    patch.difficulty.as_deref(),
                ],
            ),
        )?;

        if changed == 0 {
            debug!(
                "event=book_update module=repo backend=relational status=noop book_id={}",
                patch.id
            );
        }
        Ok(())
    }

    fn delete_book(&mut self, id: WordBookId) -> RepoResult<()> {
        let conn = self.connection_mut()?;
        let tx = logged("delete_book", "BEGIN", conn.transaction())?;

        let words_removed = logged(
            "delete_book",
            DELETE_BOOK_WORDS_SQL,
            tx.execute(DELETE_BOOK_WORDS_SQL, [id]),
        )?;
        logged("delete_book", DELETE_BOOK_SQL, tx.execute(DELETE_BOOK_SQL, [id]))?;
        logged("delete_book", "COMMIT", tx.commit())?;

        debug!(
            "event=book_delete module=repo backend=relational status=ok book_id={} words_removed={}",
            id, words_removed
        );
        Ok(())
    }

    fn add_word(&mut self, book_id: WordBookId, word: &NewWord) -> RepoResult<WordId> {
        word.validate()?;
        let conn = self.connection()?;

        let exists = logged(
            "add_word",
            BOOK_EXISTS_SQL,
            conn.query_row(BOOK_EXISTS_SQL, [book_id], |row| row.get::<_, i64>(0)),
        )?;
        if exists == 0 {
            warn!(
                "event=word_add module=repo backend=relational status=rejected reason=book_not_found book_id={}",
                book_id
            );
            return Err(RepoError::BookNotFound(book_id));
        }

        logged(
            "add_word",
            INSERT_WORD_SQL,
            conn.execute(
                INSERT_WORD_SQL,
                params![book_id, word.chinese.as_str(), word.english.as_str()],
            ),
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_word(&mut self, patch: &WordPatch) -> RepoResult<()> {
        patch.validate()?;
        let conn = self.connection()?;

        let changed = logged(
            "update_word",
            UPDATE_WORD_SQL,
            conn.execute(
                UPDATE_WORD_SQL,
                params![patch.id, patch.chinese.as_deref(), patch.english.as_deref()],
            ),
        )?;

        if changed == 0 {
            debug!(
                "event=word_update module=repo backend=relational status=noop word_id={}",
                patch.id
            );
        }
        Ok(())
    }

    fn delete_word(&mut self, book_id: WordBookId, word_id: WordId) -> RepoResult<()> {
        let conn = self.connection()?;
        // The row carries its own book; `book_id` is only needed by flat storage.
        let removed = logged(
            "delete_word",
            DELETE_WORD_SQL,
            conn.execute(DELETE_WORD_SQL, [word_id]),
        )?;
        debug!(
            "event=word_delete module=repo backend=relational status=ok book_id={} word_id={} removed={}",
            book_id, word_id, removed
        );
        Ok(())
    }
}

/// Logs a failed statement with its SQL and converts the error.
fn logged<T>(op: &str, sql: &str, result: rusqlite::Result<T>) -> RepoResult<T> {
    result.map_err(|err| {
        error!(
            "event=sql_failed module=repo op={} sql={} error={}",
            op,
            compact_sql(sql),
            err
        );
        RepoError::from(err)
    })
}

fn query_summaries(conn: &Connection) -> rusqlite::Result<Vec<WordBookSummary>> {
    let mut stmt = conn.prepare(LIST_BOOKS_SQL)?;
    let rows = stmt.query_map([], |row| {
        Ok(WordBookSummary {
            book: parse_book_row(row)?,
            word_count: count_to_usize(row.get("word_count")?),
        })
    })?;
    rows.collect()
}

fn query_words(conn: &Connection, book_id: WordBookId) -> rusqlite::Result<Vec<Word>> {
    let mut stmt = conn.prepare(SELECT_WORDS_SQL)?;
    let rows = stmt.query_map([book_id], |row| {
        Ok(Word {
            id: row.get("id")?,
            book_id: row.get("book_id")?,
            chinese: row.get("chinese")?,
            english: row.get("english")?,
        })
    })?;
    rows.collect()
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<WordBook> {
    Ok(WordBook {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        icon: row.get("icon")?,
        difficulty: row.get("difficulty")?,
        gradient: row.get("gradient")?,
        progress: row.get::<_, Option<i64>>("progress")?.unwrap_or(0),
        create_time: row.get::<_, Option<i64>>("create_time")?.unwrap_or(0),
    })
}

fn count_to_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or(0)
}
