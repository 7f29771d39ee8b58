//! Table definitions for the relational backend.
//!
//! There is no schema versioning: every statement is `IF NOT EXISTS` and is
//! re-run on each initialization.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

const CREATE_WORDBOOKS_SQL: &str = "CREATE TABLE IF NOT EXISTS wordbooks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    icon TEXT,
    difficulty TEXT,
    progress INTEGER DEFAULT 0,
    gradient TEXT,
    create_time INTEGER
);";

const CREATE_WORDS_SQL: &str = "CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER,
    chinese TEXT NOT NULL,
    english TEXT NOT NULL,
    FOREIGN KEY(book_id) REFERENCES wordbooks(id) ON DELETE CASCADE
);";

const CREATE_WORDS_BOOK_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_words_book_id ON words(book_id);";

const SCHEMA: &[(&str, &str)] = &[
    ("wordbooks", CREATE_WORDBOOKS_SQL),
    ("words", CREATE_WORDS_SQL),
    ("words", CREATE_WORDS_BOOK_INDEX_SQL),
];

/// Creates every table and index that does not exist yet.
///
/// # Errors
/// - Returns `DbError::SchemaCreation` naming the first table that failed.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    for &(table, sql) in SCHEMA {
        if let Err(err) = conn.execute_batch(sql) {
            error!(
                "event=schema_create module=db status=error table={} sql={} error={}",
                table,
                compact_sql(sql),
                err
            );
            return Err(DbError::SchemaCreation { table, source: err });
        }
    }

    info!("event=schema_create module=db status=ok");
    Ok(())
}

/// Returns whether a table with `name` exists.
pub fn table_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Collapses whitespace so multi-line statements fit in one log line.
pub(crate) fn compact_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
