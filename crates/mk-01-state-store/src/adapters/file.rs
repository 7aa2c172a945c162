//! # File-Backed Key/Value Store
//!
//! One JSON object on disk, shared by every process on the device that
//! points at the same path. Each operation re-reads the file so a write by
//! another process is visible on the next `get`.
//!
//! Individual operations are made atomic with an advisory `fs2` lock on a
//! sidecar `<file>.lock`: shared for reads, exclusive for read-modify-write.
//! Writes land in a temp file that is renamed over the original.
//!
//! A file that no longer parses as a whole reads as empty. The next write
//! replaces it, so a damaged file never blocks the game.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::domain::StoreError;
use crate::ports::KeyValueStore;

type Records = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileBackedKVStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileBackedKVStore {
    /// Open (or lazily create) a store at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match std::fs::metadata(&path) {
            Ok(metadata) => info!(
                path = %path.display(),
                bytes = metadata.len(),
                "[mk-01] Found existing store file"
            ),
            Err(_) => info!(path = %path.display(), "[mk-01] No existing store file"),
        }

        let lock_path = path.with_extension("lock");
        Ok(Self { path, lock_path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<File, StoreError> {
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?)
    }

    fn read_records(&self) -> Result<Records, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Records::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Records::new());
        }
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "[mk-01] Store file unreadable, treating as empty"
                );
                Ok(Records::new())
            }
        }
    }

    fn write_records(&self, records: &Records) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), keys = records.len(), "[mk-01] Store flushed");
        Ok(())
    }

    fn modify<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Records) -> bool,
    {
        let lock = self.lock_file()?;
        lock.lock_exclusive()?;
        let result = self.read_records().and_then(|mut records| {
            if f(&mut records) {
                self.write_records(&records)
            } else {
                Ok(())
            }
        });
        lock.unlock()?;
        result
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let lock = self.lock_file()?;
        lock.lock_shared()?;
        let result = self.read_records().map(|mut records| records.remove(key));
        lock.unlock()?;
        result
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|records| {
            records.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|records| records.remove(key).is_some())
    }
}
