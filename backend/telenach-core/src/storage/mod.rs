//! Local key-value storage.
//!
//! Stands in for browser local storage: string keys, string values, values
//! are JSON documents. Lives until explicitly cleared.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppResult;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    fn set(&self, key: &str, value: String) -> AppResult<()>;

    fn remove(&self, key: &str) -> AppResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait JsonStoreExt {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>>;

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()>;
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw)
    }
}
