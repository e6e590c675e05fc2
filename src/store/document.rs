//! # Document Store Boundary
//!
//! The async interface every backing store implements. Collections are flat;
//! the only queries are key lookups, full scans and single-field equality.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::StoreResult;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// A record together with its store-assigned key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-assigned key, unique within the collection
    pub key: String,
    /// Raw document body
    pub data: Value,
}

impl StoredDocument {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// Get a top-level field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Remote document store
///
/// Writes materialize any server timestamp marker found in the body.
pub trait DocumentStore: Send + Sync {
    /// Look up a document by key
    fn get<'a>(&'a self, collection: &'a str, key: &'a str)
        -> StoreFuture<'a, Option<StoredDocument>>;

    /// Insert a document under a freshly generated key, returning the key
    fn insert<'a>(&'a self, collection: &'a str, data: Value) -> StoreFuture<'a, String>;

    /// Create or overwrite a document under an explicit key
    fn set<'a>(&'a self, collection: &'a str, key: &'a str, data: Value) -> StoreFuture<'a, ()>;

    /// Merge top-level fields into an existing document.
    /// Returns `false` if the document does not exist.
    fn update<'a>(&'a self, collection: &'a str, key: &'a str, patch: Value)
        -> StoreFuture<'a, bool>;

    /// Remove a document. Returns whether it existed.
    fn delete<'a>(&'a self, collection: &'a str, key: &'a str) -> StoreFuture<'a, bool>;

    /// Read every document in a collection
    fn scan<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Vec<StoredDocument>>;

    /// Documents whose top-level `field` equals `value`
    fn find_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> StoreFuture<'a, Vec<StoredDocument>>;
}
