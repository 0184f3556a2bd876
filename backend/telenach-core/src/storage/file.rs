use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::AppResult;

/// Local storage persisted as a single JSON object on disk.
///
/// The whole map is rewritten on every mutation. Values are kept as strings so
/// the file mirrors what browser local storage would hold.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if !raw.trim().is_empty() {
                let map: BTreeMap<String, String> = serde_json::from_str(&raw)?;
                for (k, v) in map {
                    entries.insert(k, v);
                }
            }
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened local store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> AppResult<()> {
        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
