//! File-backed local store.
//!
//! Entries live in a single TOML file, read on every access so a record
//! written by one invocation is seen by the next.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rollcall_enroll::{LocalStore, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Store key to raw stored value.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Persistent [`LocalStore`] for this client.
#[derive(Debug)]
pub struct FileStore {
    /// TOML file holding every entry. Created on first write.
    path: PathBuf,
    /// Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Read(format!("{}: {e}", self.path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| StoreError::Read(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Write(format!("{}: {e}", parent.display()))
            })?;
        }

        let content =
            toml::to_string_pretty(file).map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::Write(format!("{}: {e}", self.path.display())))
    }

    fn update(&self, apply: impl FnOnce(&mut StoreFile)) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Write(e.to_string()))?;

        let mut file = self.load()?;
        apply(&mut file);
        self.save(&file)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|file| {
            file.entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|file| {
            file.entries.remove(key);
        })
    }
}
