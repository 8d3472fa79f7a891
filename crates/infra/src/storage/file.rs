//! JSON file key-value store
//!
//! All entries live in one JSON object. Every write rewrites the file through
//! a sibling temp file followed by a rename, so readers never observe a
//! half-written document. A missing or unreadable file behaves as empty.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use carelink_core::{KeyValueStore, StorageError};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::errors::conversions::{io_storage_error, json_storage_error};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to a single JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// Parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Entries {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "storage file unreadable; treating as empty");
                return Entries::new();
            }
        };
        if raw.trim().is_empty() {
            return Entries::new();
        }
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "storage file corrupt; treating as empty");
            Entries::new()
        })
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| io_storage_error("failed to create storage directory", &e))?;
        }

        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| json_storage_error("failed to serialize storage", &e))?;

        let tmp = self.path.with_extension("tmp");
        let mut file =
            fs::File::create(&tmp).map_err(|e| io_storage_error("failed to create temp file", &e))?;
        file.write_all(&json).map_err(|e| io_storage_error("failed to write temp file", &e))?;
        file.sync_all().map_err(|e| io_storage_error("failed to sync temp file", &e))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .map_err(|e| io_storage_error("failed to replace storage file", &e))?;
        debug!(path = %self.path.display(), entries = entries.len(), "storage file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load().remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}
