use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Tab-scoped string storage (the browser's session storage, or a stand-in).
///
/// Multi-key writes and removals are applied as one unit so that related
/// keys never disagree.
pub trait KeyValueStorage {
    /// Reads a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes every pair, replacing existing values.
    fn set_many(&self, entries: &[(&str, String)]);

    /// Removes every listed key.
    fn remove_many(&self, keys: &[&str]);
}

/// An in-process `KeyValueStorage`. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates a new, empty `MemoryStorage`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set_many(&self, items: &[(&str, String)]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for (key, value) in items {
            entries.insert((*key).to_string(), value.clone());
        }
    }

    fn remove_many(&self, keys: &[&str]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            entries.remove(*key);
        }
    }
}
