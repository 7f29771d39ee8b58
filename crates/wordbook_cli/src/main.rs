//! CLI smoke entry point.
//!
//! Opens the storage facade from `WORDBOOK_*` environment variables and
//! prints every word book with its live word count.

use std::process::ExitCode;
use wordbook_core::{init_logging, LogLevel, StorageConfig, WordBookStorage};

const LOG_DIR_ENV: &str = "WORDBOOK_LOG_DIR";

fn main() -> ExitCode {
    println!("wordbook_core version={}", wordbook_core::core_version());

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(LogLevel::build_default().as_str(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorageConfig::from_env()?;
    let storage = WordBookStorage::open(&config)?;
    println!(
        "backend={} data_dir={}",
        storage.backend_kind(),
        config.data_dir().display()
    );

    for summary in storage.list_books()? {
        println!(
            "{:>14}  {:<12} words={}",
            summary.book.id, summary.book.title, summary.word_count
        );
    }
    Ok(())
}
