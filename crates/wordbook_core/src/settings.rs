//! Persisted UI theme preference.
//!
//! The value is owned by the caller and loaded/saved explicitly through a
//! `KeyValueStore`; there is no module-level state.

use crate::kv::{read_json, write_json, KeyValueStore, KvResult};
use log::error;

const THEME_KEY: &str = "app_theme_dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeSettings {
    pub is_dark: bool,
}

impl ThemeSettings {
    /// Loads the stored preference, falling back to light mode when nothing
    /// is stored or the stored value cannot be read.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match read_json::<S, bool>(store, THEME_KEY) {
            Ok(Some(is_dark)) => Self { is_dark },
            Ok(None) => Self::default(),
            Err(err) => {
                error!("event=theme_load module=settings status=error error={err}");
                Self::default()
            }
        }
    }

    /// Flips the preference and persists it, returning the new value.
    ///
    /// The in-memory value is flipped even when persisting fails.
    pub fn toggle<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> KvResult<bool> {
        self.is_dark = !self.is_dark;
        if let Err(err) = write_json(store, THEME_KEY, &self.is_dark) {
            error!("event=theme_save module=settings status=error error={err}");
            return Err(err);
        }
        Ok(self.is_dark)
    }
}
