#![cfg(feature = "relational")]

use wordbook_core::db::schema::table_exists;
use wordbook_core::db::DbError;
use wordbook_core::{
    BackendKind, NewWord, NewWordBook, RepoError, SqliteWordBookRepository, StorageConfig,
    StorageError, StoreState, ValidationError, WordBookPatch, WordBookRepository, WordBookStorage,
    WordPatch,
};

fn prepared_repo() -> SqliteWordBookRepository {
    let mut repo = SqliteWordBookRepository::in_memory();
    assert_eq!(repo.prepare().unwrap(), StoreState::Empty);
    repo
}

fn raw_word_count(repo: &SqliteWordBookRepository, book_id: i64) -> i64 {
    repo.connection()
        .unwrap()
        .query_row(
            "SELECT count(*) FROM words WHERE book_id = ?1;",
            [book_id],
            |row| row.get(0),
        )
        .unwrap()
}

#[test]
fn prepare_creates_both_tables() {
    let repo = prepared_repo();
    let conn = repo.connection().unwrap();

    assert!(table_exists(conn, "wordbooks").unwrap());
    assert!(table_exists(conn, "words").unwrap());
}

#[test]
fn operations_before_prepare_report_not_initialized() {
    let mut repo = SqliteWordBookRepository::in_memory();

    assert!(matches!(repo.list_books(), Err(RepoError::NotInitialized)));
    assert!(matches!(
        repo.add_book(&NewWordBook::new("early")),
        Err(RepoError::NotInitialized)
    ));
}

#[test]
fn repeated_prepare_on_open_connection_keeps_data() {
    let mut repo = prepared_repo();
    repo.add_book(&NewWordBook::new("kept")).unwrap();

    assert_eq!(repo.prepare().unwrap(), StoreState::Populated);
    assert_eq!(repo.count_books().unwrap(), 1);
}

#[test]
fn database_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("word_game.db");

    let book_id = {
        let mut repo = SqliteWordBookRepository::new(&path);
        assert_eq!(repo.prepare().unwrap(), StoreState::Empty);
        let id = repo.add_book(&NewWordBook::new("persisted")).unwrap();
        repo.add_word(id, &NewWord::new("书", "book")).unwrap();
        id
    };

    let mut reopened = SqliteWordBookRepository::new(&path);
    assert_eq!(reopened.prepare().unwrap(), StoreState::Populated);
    let detail = reopened.get_book(book_id).unwrap().unwrap();
    assert_eq!(detail.book.title, "persisted");
    assert_eq!(detail.words.len(), 1);
}

#[test]
fn new_book_starts_without_words() {
    let mut repo = prepared_repo();
    let id = repo
        .add_book(&NewWordBook::new("Empty").with_icon("📘"))
        .unwrap();

    let detail = repo.get_book(id).unwrap().unwrap();
    assert_eq!(detail.book.id, id);
    assert_eq!(detail.book.icon.as_deref(), Some("📘"));
    assert_eq!(detail.book.progress, 0);
    assert!(detail.book.create_time > 0);
    assert!(detail.words.is_empty());
}

#[test]
fn get_missing_book_returns_none() {
    let repo = prepared_repo();
    assert!(repo.get_book(404).unwrap().is_none());
}

#[test]
fn list_is_newest_first_with_live_word_counts() {
    let mut repo = prepared_repo();
    let older = repo.add_book(&NewWordBook::new("older")).unwrap();
    let newer = repo.add_book(&NewWordBook::new("newer")).unwrap();

    let first = repo.add_word(older, &NewWord::new("一", "one")).unwrap();
    repo.add_word(older, &NewWord::new("二", "two")).unwrap();
    repo.add_word(newer, &NewWord::new("三", "three")).unwrap();
    repo.delete_word(older, first).unwrap();

    let listed = repo.list_books().unwrap();
    let ids: Vec<i64> = listed.iter().map(|summary| summary.book.id).collect();
    assert_eq!(ids, vec![newer, older]);
    assert_eq!(listed[0].word_count, 1);
    assert_eq!(listed[1].word_count, 1);
}

#[test]
fn delete_word_removes_row_regardless_of_supplied_book() {
    let mut repo = prepared_repo();
    let owner = repo.add_book(&NewWordBook::new("owner")).unwrap();
    let other = repo.add_book(&NewWordBook::new("other")).unwrap();
    let word_id = repo.add_word(owner, &NewWord::new("云", "cloud")).unwrap();

    repo.delete_word(other, word_id).unwrap();

    assert_eq!(raw_word_count(&repo, owner), 0);
    assert!(repo.get_book(owner).unwrap().unwrap().words.is_empty());
}

#[test]
fn unreadable_database_file_fails_open_with_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(dir.path()).with_backend(BackendKind::Relational);
    std::fs::write(
        config.database_path(),
        "plain text, not an sqlite database\n".repeat(64),
    )
    .unwrap();

    let result = WordBookStorage::open(&config);

    assert!(matches!(
        result,
        Err(StorageError::Repo(RepoError::Db(DbError::SchemaCreation {
            table: "wordbooks",
            ..
        })))
    ));
}

#[test]
fn update_book_only_writes_title_description_and_difficulty() {
    let mut repo = prepared_repo();
    let id = repo
        .add_book(
            &NewWordBook::new("Draft")
                .with_description("before")
                .with_icon("🐾")
                .with_gradient("pink"),
        )
        .unwrap();

    repo.update_book(&WordBookPatch {
        title: Some("Final".to_string()),
        difficulty: Some("hard".to_string()),
        icon: Some("📚".to_string()),
        gradient: Some("blue".to_string()),
        progress: Some(80),
        ..WordBookPatch::new(id)
    })
    .unwrap();

    let book = repo.get_book(id).unwrap().unwrap().book;
    assert_eq!(book.title, "Final");
    assert_eq!(book.description.as_deref(), Some("before"));
    assert_eq!(book.difficulty.as_deref(), Some("hard"));
    assert_eq!(book.icon.as_deref(), Some("🐾"));
    assert_eq!(book.gradient.as_deref(), Some("pink"));
    assert_eq!(book.progress, 0);
}

#[test]
fn update_book_rejects_blank_title_and_ignores_missing_id() {
    let mut repo = prepared_repo();

    let err = repo
        .update_book(&WordBookPatch {
            title: Some("  ".to_string()),
            ..WordBookPatch::new(1)
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::BlankTitle)));

    repo.update_book(&WordBookPatch {
        title: Some("ghost".to_string()),
        ..WordBookPatch::new(999)
    })
    .unwrap();
    assert_eq!(repo.count_books().unwrap(), 0);
}

#[test]
fn delete_book_removes_owned_words() {
    let mut repo = prepared_repo();
    let doomed = repo.add_book(&NewWordBook::new("doomed")).unwrap();
    let kept = repo.add_book(&NewWordBook::new("kept")).unwrap();
    repo.add_word(doomed, &NewWord::new("火", "fire")).unwrap();
    repo.add_word(doomed, &NewWord::new("水", "water")).unwrap();
    repo.add_word(kept, &NewWord::new("土", "earth")).unwrap();

    repo.delete_book(doomed).unwrap();

    assert!(repo.get_book(doomed).unwrap().is_none());
    assert_eq!(raw_word_count(&repo, doomed), 0);
    assert_eq!(raw_word_count(&repo, kept), 1);
}

#[test]
fn declared_foreign_key_cascades_raw_parent_delete() {
    let mut repo = prepared_repo();
    let id = repo.add_book(&NewWordBook::new("raw")).unwrap();
    repo.add_word(id, &NewWord::new("风", "wind")).unwrap();

    repo.connection()
        .unwrap()
        .execute("DELETE FROM wordbooks WHERE id = ?1;", [id])
        .unwrap();

    assert_eq!(raw_word_count(&repo, id), 0);
}

#[test]
fn add_word_to_missing_book_is_rejected() {
    let mut repo = prepared_repo();
    let err = repo.add_word(77, &NewWord::new("孤", "orphan")).unwrap_err();
    assert!(matches!(err, RepoError::BookNotFound(77)));
    assert_eq!(raw_word_count(&repo, 77), 0);
}

#[test]
fn update_word_resolves_book_from_row() {
    let mut repo = prepared_repo();
    let book_id = repo.add_book(&NewWordBook::new("words")).unwrap();
    let word_id = repo.add_word(book_id, &NewWord::new("考试", "test")).unwrap();

    repo.update_word(&WordPatch::new(word_id).with_english("exam"))
        .unwrap();

    let words = repo.get_book(book_id).unwrap().unwrap().words;
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].chinese, "考试");
    assert_eq!(words[0].english, "exam");
    assert_eq!(words[0].book_id, book_id);
}

#[test]
fn blank_word_terms_are_rejected() {
    let mut repo = prepared_repo();
    let book_id = repo.add_book(&NewWordBook::new("words")).unwrap();

    let err = repo.add_word(book_id, &NewWord::new("", "x")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::BlankChinese)));

    let word_id = repo.add_word(book_id, &NewWord::new("x", "x")).unwrap();
    let err = repo
        .update_word(&WordPatch::new(word_id).with_english(" "))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::BlankEnglish)));
}

#[test]
fn add_word_then_delete_book_scenario() {
    let mut repo = prepared_repo();
    let id = repo.add_book(&NewWordBook::new("Test")).unwrap();
    repo.add_word(id, &NewWord::new("测试", "test")).unwrap();

    let detail = repo.get_book(id).unwrap().unwrap();
    assert_eq!(detail.words.len(), 1);
    assert_eq!(detail.words[0].chinese, "测试");
    assert_eq!(detail.words[0].english, "test");

    repo.delete_book(id).unwrap();
    assert!(repo.get_book(id).unwrap().is_none());
}
