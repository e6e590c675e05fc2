//! Shared integration test utilities

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pressroom::gate::AuthProvider;
use pressroom::store::{DocumentStore, MemoryStore, StoreError, StoreFuture, StoredDocument};
use pressroom::ContentService;
use serde_json::{json, Value};

// =============================================================================
// Fault-Injecting Store
// =============================================================================

/// Memory store whose reads can be made to fail per collection
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_gets: Mutex<HashSet<String>>,
    failing_scans: Mutex<HashSet<String>>,
    failing_finds: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_gets(&self, collection: &str) {
        self.failing_gets.lock().unwrap().insert(collection.to_string());
    }

    pub fn fail_scans(&self, collection: &str) {
        self.failing_scans.lock().unwrap().insert(collection.to_string());
    }

    pub fn fail_finds(&self, collection: &str) {
        self.failing_finds.lock().unwrap().insert(collection.to_string());
    }

    pub fn heal(&self) {
        self.failing_gets.lock().unwrap().clear();
        self.failing_scans.lock().unwrap().clear();
        self.failing_finds.lock().unwrap().clear();
    }

    fn failing(set: &Mutex<HashSet<String>>, collection: &str) -> bool {
        set.lock().unwrap().contains(collection)
    }

    fn unavailable<'a, T: Send + 'a>(collection: &str) -> StoreFuture<'a, T> {
        let reason = format!("injected failure on {}", collection);
        Box::pin(async move { Err(StoreError::Unavailable(reason)) })
    }
}

impl DocumentStore for FlakyStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<StoredDocument>> {
        if Self::failing(&self.failing_gets, collection) {
            return Self::unavailable(collection);
        }
        self.inner.get(collection, key)
    }

    fn insert<'a>(&'a self, collection: &'a str, data: Value) -> StoreFuture<'a, String> {
        self.inner.insert(collection, data)
    }

    fn set<'a>(&'a self, collection: &'a str, key: &'a str, data: Value) -> StoreFuture<'a, ()> {
        self.inner.set(collection, key, data)
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        key: &'a str,
        patch: Value,
    ) -> StoreFuture<'a, bool> {
        self.inner.update(collection, key, patch)
    }

    fn delete<'a>(&'a self, collection: &'a str, key: &'a str) -> StoreFuture<'a, bool> {
        self.inner.delete(collection, key)
    }

    fn scan<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, Vec<StoredDocument>> {
        if Self::failing(&self.failing_scans, collection) {
            return Self::unavailable(collection);
        }
        self.inner.scan(collection)
    }

    fn find_eq<'a>(
        &'a self,
        collection: &'a str,
        field: &'a str,
        value: &'a Value,
    ) -> StoreFuture<'a, Vec<StoredDocument>> {
        if Self::failing(&self.failing_finds, collection) {
            return Self::unavailable(collection);
        }
        self.inner.find_eq(collection, field, value)
    }
}

// =============================================================================
// Counting Auth Provider
// =============================================================================

/// Auth provider that counts sign-in attempts and answers after a delay
pub struct CountingAuth {
    attempts: AtomicUsize,
    succeed: bool,
}

impl CountingAuth {
    pub fn succeeding() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            succeed: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            succeed: false,
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AuthProvider for CountingAuth {
    fn current_identity(&self) -> Option<String> {
        None
    }

    fn sign_in(&self) -> StoreFuture<'_, String> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let succeed = self.succeed;
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if succeed {
                Ok(format!("anon-{}", attempt))
            } else {
                Err(StoreError::Unavailable("auth outage".to_string()))
            }
        })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Service over a fresh flaky store, with users `u1` (ada) and `u2` (bob)
pub async fn service_with_users() -> (ContentService, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::new());
    seed_user(&store, "u1", "ada").await;
    seed_user(&store, "u2", "bob").await;
    let service = ContentService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(CountingAuth::succeeding()),
    );
    (service, store)
}

pub async fn seed_user(store: &FlakyStore, key: &str, username: &str) {
    store
        .set(
            "users",
            key,
            json!({"username": username, "email": format!("{}@example.com", username)}),
        )
        .await
        .unwrap();
}

/// `{seconds, nanoseconds}` timestamp as the store materializes it
pub fn at(seconds: i64) -> Value {
    json!({"seconds": seconds, "nanoseconds": 0})
}
