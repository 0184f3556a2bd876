use dashmap::DashMap;

use super::KeyValueStore;
use crate::error::AppResult;

/// Ephemeral store, cleared when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
