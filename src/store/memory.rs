//! # In-Memory Document Store
//!
//! Process-local store with the same semantics as the remote one.
//! Used by tests and as the engine underneath [`super::FileStore`].

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::document::{DocumentStore, StoreFuture, StoredDocument};
use super::errors::{StoreError, StoreResult};
use super::timestamp::{materialize, MonotonicClock};

/// Collection name -> key -> document body
pub type Snapshot = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default)]
struct MemoryState {
    collections: Snapshot,
    clock: MonotonicClock,
}

impl MemoryState {
    fn stamp(&mut self, data: &mut Value) {
        let at = self.clock.tick();
        materialize(data, at);
    }
}

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated from a snapshot
    pub fn from_snapshot(collections: Snapshot) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                collections,
                clock: MonotonicClock::new(),
            }),
        }
    }

    /// Copy of every collection
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.collections.clone())
    }

    /// Replace every collection with `collections`. The clock keeps running.
    pub(crate) fn restore(&self, collections: Snapshot) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        state.collections = collections;
        Ok(())
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> StoreResult<usize> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.collections.get(collection).map_or(0, BTreeMap::len))
    }

    pub(crate) fn read_document(
        &self,
        collection: &str,
        key: &str,
    ) -> StoreResult<Option<StoredDocument>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .map(|data| StoredDocument::new(key, data.clone())))
    }

    pub(crate) fn insert_document(&self, collection: &str, mut data: Value) -> StoreResult<String> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        state.stamp(&mut data);

        let docs = state.collections.entry(collection.to_string()).or_default();
        let mut key = Uuid::new_v4().simple().to_string();
        while docs.contains_key(&key) {
            key = Uuid::new_v4().simple().to_string();
        }
        docs.insert(key.clone(), data);
        Ok(key)
    }

    pub(crate) fn set_document(&self, collection: &str, key: &str, mut data: Value) -> StoreResult<()> {
        if !data.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        state.stamp(&mut data);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), data);
        Ok(())
    }

    pub(crate) fn update_document(
        &self,
        collection: &str,
        key: &str,
        mut patch: Value,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        state.stamp(&mut patch);

        let Value::Object(fields) = patch else {
            return Err(StoreError::NotAnObject);
        };
        let Some(existing) = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
        else {
            return Ok(false);
        };
        let Some(base) = existing.as_object_mut() else {
            return Err(StoreError::NotAnObject);
        };
        for (name, value) in fields {
            base.insert(name, value);
        }
        Ok(true)
    }

    pub(crate) fn delete_document(&self, collection: &str, key: &str) -> StoreResult<bool> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(key))
            .is_some())
    }

    pub(crate) fn scan_collection(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, data)| StoredDocument::new(key.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub(crate) fn find_documents(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredDocument>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| data.get(field) == Some(value))
                    .map(|(key, data)| StoredDocument::new(key.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl DocumentStore for MemoryStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<StoredDocument>> {
        let result = self.read_document(collection, key);
        Box::pin(async move { result })
    }

    fn insert<'a>(&'a self, collection: &'a str, data: Value) -> StoreFuture<'a, String> {
        let result = self.insert_document(collection, data);
        Box::pin(async move { result })
    }

    fn set<'a>(&'a self, collection: &'a str, key: &'a str, data: Value) -> StoreFuture<'a, ()> {
        let result = self.set_document(collection, key, data);
        Box::pin(async move { result })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
        patch: Value,
    ) -> StoreFuture<'a, bool> {
        let result = self.update_document(collection, key, patch);
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a self, collection: &'a str, key: &'a str) -> StoreFuture<'a, bool> {
        let result = self.delete_document(collection, key);
        Box::pin(async move { result })
    }

    fn scan<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Vec<StoredDocument>> {
        let result = self.scan_collection(collection);
        Box::pin(async move { result })
    }

    fn find_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> StoreFuture<'a, Vec<StoredDocument>> {
        let result = self.find_documents(collection, field, value);
        Box::pin(async move { result })
    }
}
