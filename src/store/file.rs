//! # File-Backed Document Store
//!
//! JSON snapshot persistence over [`MemoryStore`]. The whole snapshot is
//! rewritten after every successful mutation.
//!
//! Mutations are serialized by a single write lock held across the memory
//! change, the snapshot and the rename. If the snapshot cannot be written
//! the memory change is rolled back, so a failed write is never visible to
//! later reads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use super::document::{DocumentStore, StoreFuture, StoredDocument};
use super::errors::{StoreError, StoreResult};
use super::memory::{MemoryStore, Snapshot};

/// Document store persisted to a single JSON file
#[derive(Debug)]
pub struct FileStore {
    memory: MemoryStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, loading the existing snapshot if present
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Self::load_snapshot(&path)?;
        Ok(Self {
            memory: MemoryStore::from_snapshot(snapshot),
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_snapshot(path: &Path) -> StoreResult<Snapshot> {
        if !path.exists() {
            return Ok(Snapshot::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Snapshot::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write beside the target, then rename over it
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Apply `mutate` to memory and persist the result.
    ///
    /// `changed` decides from the mutation's output whether anything needs
    /// writing. On a failed write memory is restored to its prior state.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&MemoryStore) -> StoreResult<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let before = self.memory.snapshot()?;

        let value = mutate(&self.memory)?;
        if !changed(&value) {
            return Ok(value);
        }

        let after = self.memory.snapshot()?;
        if let Err(e) = self.write_snapshot(&after) {
            self.memory.restore(before)?;
            return Err(e);
        }
        Ok(value)
    }
}

impl DocumentStore for FileStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<StoredDocument>> {
        let result = self.memory.read_document(collection, key);
        Box::pin(async move { result })
    }

    fn insert<'a>(&'a self, collection: &'a str, data: Value) -> StoreFuture<'a, String> {
        let result = self.commit(|m| m.insert_document(collection, data), |_| true);
        Box::pin(async move { result })
    }

    fn set<'a>(&'a self, collection: &'a str, key: &'a str, data: Value) -> StoreFuture<'a, ()> {
        let result = self.commit(|m| m.set_document(collection, key, data), |_| true);
        Box::pin(async move { result })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
        patch: Value,
    ) -> StoreFuture<'a, bool> {
        let result = self.commit(|m| m.update_document(collection, key, patch), |found| *found);
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a self, collection: &'a str, key: &'a str) -> StoreFuture<'a, bool> {
        let result = self.commit(|m| m.delete_document(collection, key), |found| *found);
        Box::pin(async move { result })
    }

    fn scan<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Vec<StoredDocument>> {
        let result = self.memory.scan_collection(collection);
        Box::pin(async move { result })
    }

    fn find_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> StoreFuture<'a, Vec<StoredDocument>> {
        let result = self.memory.find_documents(collection, field, value);
        Box::pin(async move { result })
    }
}
