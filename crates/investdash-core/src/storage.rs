//! Local key-value snapshot of the investment record.
//!
//! One JSON document lives under one key. Reads never fail from the caller's
//! point of view: a missing, unreadable or malformed snapshot is "absent".

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::InvestDashError;
use crate::record::InvestmentRecord;
use crate::InvestDashResult;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> InvestDashResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> InvestDashResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> InvestDashResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> InvestDashResult<()> {
        (**self).set(key, value)
    }
}

fn validate_key(key: &str) -> InvestDashResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(InvestDashError::InvalidInput {
            field: "storage_key".into(),
            reason: format!("'{key}' may only contain letters, digits, '.', '_' and '-'"),
        })
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> InvestDashResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> InvestDashResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InvestDashError::Storage(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> InvestDashResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write next to the target and rename so a crash never leaves half a snapshot.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path).map_err(|e| {
            InvestDashError::Storage(format!("Failed to write '{}': {}", path.display(), e))
        })?;
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> InvestDashResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| InvestDashError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> InvestDashResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| InvestDashError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the record under a fixed, caller-supplied key.
pub struct RecordRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RecordRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored record, or `None` when absent, unreadable or malformed.
    pub fn load(&self) -> Option<InvestmentRecord> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read saved record");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring malformed saved record");
                None
            }
        }
    }

    pub fn load_or_default(&self) -> InvestmentRecord {
        self.load().unwrap_or_default()
    }

    pub fn save(&self, record: &InvestmentRecord) -> InvestDashResult<()> {
        let json = serde_json::to_string(record)?;
        self.store.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, bytes = json.len(), "saved record");
        Ok(())
    }
}
