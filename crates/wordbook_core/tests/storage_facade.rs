use wordbook_core::{
    BackendKind, FlatWordBookRepository, MemoryKvStore, NewWord, NewWordBook, StorageConfig,
    WordBookStorage,
};

fn assert_seeded(storage: &WordBookStorage) {
    let listed = storage.list_books().unwrap();
    let titles: Vec<&str> = listed.iter().map(|summary| summary.book.title.as_str()).collect();
    assert_eq!(titles, vec!["动物世界", "基础词汇"]);
    assert_eq!(listed[0].word_count, 4);
    assert_eq!(listed[1].word_count, 5);
}

fn run_book_lifecycle(storage: &mut WordBookStorage) {
    let id = storage.add_book(&NewWordBook::new("Test")).unwrap();
    assert!(storage.get_book(id).unwrap().unwrap().words.is_empty());
    assert_eq!(storage.list_books().unwrap()[0].book.id, id);

    storage.add_word(id, &NewWord::new("测试", "test")).unwrap();
    let detail = storage.get_book(id).unwrap().unwrap();
    assert_eq!(detail.words.len(), 1);
    assert_eq!(detail.words[0].chinese, "测试");
    assert_eq!(detail.words[0].english, "test");

    storage.delete_book(id).unwrap();
    assert!(storage.get_book(id).unwrap().is_none());
    assert!(storage
        .list_books()
        .unwrap()
        .iter()
        .all(|summary| summary.book.id != id));
}

#[test]
fn flat_storage_first_run_seeds_exactly_two_books() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(dir.path()).with_backend(BackendKind::FlatStorage);

    let storage = WordBookStorage::open(&config).unwrap();
    assert_eq!(storage.backend_kind(), BackendKind::FlatStorage);
    assert_seeded(&storage);
    drop(storage);

    let reopened = WordBookStorage::open(&config).unwrap();
    assert_seeded(&reopened);
}

#[test]
fn repeated_initialize_does_not_duplicate_seed_data() {
    let backend = Box::new(FlatWordBookRepository::new(MemoryKvStore::new()));
    let mut storage = WordBookStorage::with_backend(backend);

    storage.initialize().unwrap();
    storage.initialize().unwrap();

    assert_seeded(&storage);
}

#[test]
fn flat_storage_lifecycle_through_facade() {
    let mut storage =
        WordBookStorage::with_backend(Box::new(FlatWordBookRepository::new(MemoryKvStore::new())));
    storage.initialize().unwrap();
    run_book_lifecycle(&mut storage);
    assert_seeded(&storage);
}

#[test]
fn flat_storage_is_not_reseeded_after_user_empties_it() {
    let mut storage =
        WordBookStorage::with_backend(Box::new(FlatWordBookRepository::new(MemoryKvStore::new())));
    storage.initialize().unwrap();

    for summary in storage.list_books().unwrap() {
        storage.delete_book(summary.book.id).unwrap();
    }
    storage.initialize().unwrap();

    assert!(storage.list_books().unwrap().is_empty());
}

#[test]
fn config_from_lookup_drives_backend_selection() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap().to_string();
    let config = StorageConfig::from_lookup(|key| match key {
        "WORDBOOK_BACKEND" => Some("flat".to_string()),
        "WORDBOOK_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .unwrap();

    let storage = WordBookStorage::open(&config).unwrap();
    assert_eq!(storage.backend_kind(), BackendKind::FlatStorage);
    assert!(dir.path().join("storage").join("wordbooks_db.json").exists());
}

#[cfg(feature = "relational")]
mod relational {
    use super::{assert_seeded, run_book_lifecycle};
    use wordbook_core::{BackendKind, SqliteWordBookRepository, StorageConfig, WordBookStorage};

    #[test]
    fn default_backend_is_relational_and_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path());

        let storage = WordBookStorage::open(&config).unwrap();
        assert_eq!(storage.backend_kind(), BackendKind::Relational);
        assert_seeded(&storage);
        assert!(config.database_path().exists());
        drop(storage);

        let reopened = WordBookStorage::open(&config).unwrap();
        assert_seeded(&reopened);
    }

    #[test]
    fn relational_lifecycle_through_facade() {
        let mut storage =
            WordBookStorage::with_backend(Box::new(SqliteWordBookRepository::in_memory()));
        storage.initialize().unwrap();
        storage.initialize().unwrap();
        run_book_lifecycle(&mut storage);
        assert_seeded(&storage);
    }

    #[test]
    fn relational_store_is_reseeded_when_no_books_remain() {
        let mut storage =
            WordBookStorage::with_backend(Box::new(SqliteWordBookRepository::in_memory()));
        storage.initialize().unwrap();

        for summary in storage.list_books().unwrap() {
            storage.delete_book(summary.book.id).unwrap();
        }
        storage.initialize().unwrap();

        assert_seeded(&storage);
    }
}
