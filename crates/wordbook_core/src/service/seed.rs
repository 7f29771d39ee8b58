//! Default data written to a freshly created store.
//!
//! # Invariants
//! - Seeding goes through the public `add_book`/`add_word` operations, so
//!   seeded rows get the same validation and id assignment as user data.
//! - Callers check emptiness first; running twice duplicates the books.

use crate::model::word::NewWord;
use crate::model::wordbook::{Difficulty, NewWordBook, WordBookId};
use crate::repo::wordbook_repo::{RepoResult, WordBookRepository};
use log::info;

struct DefaultBook {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    difficulty: Difficulty,
    gradient: &'static str,
    words: &'static [(&'static str, &'static str)],
}

const DEFAULT_BOOKS: &[DefaultBook] = &[
    DefaultBook {
        title: "基础词汇",
        description: "日常生活中的常用词汇",
        icon: "📚",
        difficulty: Difficulty::Easy,
        gradient: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        words: &[
            ("苹果", "apple"),
            ("香蕉", "banana"),
            ("橙子", "orange"),
            ("电脑", "computer"),
            ("手机", "phone"),
        ],
    },
    DefaultBook {
        title: "动物世界",
        description: "各种动物的英文名称",
        icon: "🐾",
        difficulty: Difficulty::Medium,
        gradient: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
        words: &[
            ("猫", "cat"),
            ("狗", "dog"),
            ("鸟", "bird"),
            ("老虎", "tiger"),
        ],
    },
];

/// Inserts the default books and their words, returning the new book ids in
/// insertion order.
pub fn seed_default_data(repo: &mut dyn WordBookRepository) -> RepoResult<Vec<WordBookId>> {
    let mut created = Vec::with_capacity(DEFAULT_BOOKS.len());

    for default in DEFAULT_BOOKS {
        let book = NewWordBook::new(default.title)
            .with_description(default.description)
            .with_icon(default.icon)
            .with_difficulty(default.difficulty)
            .with_gradient(default.gradient);
        let book_id = repo.add_book(&book)?;

        for (chinese, english) in default.words {
            repo.add_word(book_id, &NewWord::new(*chinese, *english))?;
        }
        created.push(book_id);
    }

    info!(
        "event=seed_default_data module=service status=ok backend={} books={}",
        repo.backend_kind(),
        created.len()
    );
    Ok(created)
}
