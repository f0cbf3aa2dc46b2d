use nixvis_dashboard::{MemoryPreferences, PreferenceStore};
use tracing::warn;
use web_sys::Storage;

use crate::api::describe_js;

/// `localStorage`-backed preferences. Any storage failure is logged and
/// served from memory instead, so the value still holds for this page load.
pub struct LocalStoragePreferences {
    storage: Option<Storage>,
    fallback: MemoryPreferences,
}

impl LocalStoragePreferences {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(error) => {
                warn!(error = %describe_js(&error), "local storage is not accessible");
                None
            }
        });

        if storage.is_none() {
            warn!("website preference will not persist across page loads");
        }

        Self {
            storage,
            fallback: MemoryPreferences::new(),
        }
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn get(&self, key: &str, default: &str) -> String {
        let Some(storage) = &self.storage else {
            return self.fallback.get(key, default);
        };

        match storage.get_item(key) {
            Ok(Some(value)) => value,
            Ok(None) => self.fallback.get(key, default),
            Err(error) => {
                warn!(key, error = %describe_js(&error), "failed to read preference");
                self.fallback.get(key, default)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(error) = storage.set_item(key, value) {
                warn!(key, error = %describe_js(&error), "failed to persist preference");
            }
        }
        self.fallback.set(key, value);
    }
}
