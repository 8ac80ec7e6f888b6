//! Key/value persistence
//!
//! LocalStorage on web, an in-memory map everywhere else. Storage failures
//! are logged and treated as absence; nothing here is fatal.

use std::collections::HashMap;

/// Minimal string store behind the best score and settings
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Process-local store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - nothing will be persisted");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {key} to LocalStorage");
            }
        }
    }
}
