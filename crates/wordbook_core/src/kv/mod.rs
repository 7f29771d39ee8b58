//! Key-scoped flat storage used where no SQL engine is available.
//!
//! # Responsibility
//! - Define the minimal `get/set/remove` contract the flat backend needs.
//! - Provide JSON helpers so collections round-trip as whole values.
//!
//! # Invariants
//! - Values are opaque strings; there is no partial update of a value.
//! - Removing a missing key is not an error.

mod file;
mod memory;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KvResult<T> = Result<T, KvError>;

#[derive(Debug)]
pub enum KvError {
    Io(std::io::Error),
    Serde {
        key: String,
        source: serde_json::Error,
    },
    InvalidKey(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Serde { key, source } => write!(f, "invalid value under `{key}`: {source}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde { source, .. } => Some(source),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for KvError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Flat key/value persistence facility.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&mut self, key: &str) -> KvResult<()>;

    fn contains(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Reads and deserializes the value under `key`.
pub fn read_json<S, T>(store: &S, key: &str) -> KvResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| KvError::Serde {
            key: key.to_string(),
            source,
        })
}

/// Serializes `value` and stores it under `key`, replacing any previous value.
pub fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> KvResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| KvError::Serde {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

pub(crate) fn validate_key(key: &str) -> KvResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidKey(key.to_string()))
    }
}
