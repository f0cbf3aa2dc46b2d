//! Durable storage for the last selected website.
//!
//! Reads and writes never fail from the caller's side: a missing key yields
//! the default, and a backend that cannot be reached degrades to memory.

use std::collections::HashMap;

/// Key the selected website id is stored under.
pub const SELECTED_WEBSITE_KEY: &str = "selectedWebsite";

pub trait PreferenceStore {
    fn get(&self, key: &str, default: &str) -> String;
    fn set(&mut self, key: &str, value: &str);
}

/// Non-persistent store, also used as the fallback when browser storage is
/// unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .map_or_else(|| default.to_string(), Clone::clone)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
