//! Key/value string storage
//!
//! LocalStorage on the web, an in-process map on native. Failures are logged
//! and swallowed: storage is a nice-to-have and must never stop the game.

/// String storage under fixed keys
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, '{}' not saved", key);
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!("Failed to write '{}' to LocalStorage", key);
        }
    }
}

/// In-memory storage (native builds and tests)
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: std::collections::BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Storage backend for the current platform
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn Storage> {
    Box::new(LocalStorage)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn Storage> {
    Box::new(MemoryStorage::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::default();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v");
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.set("k", "w");
        assert_eq!(storage.get("k").as_deref(), Some("w"));
    }
}
