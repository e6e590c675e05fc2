//! # Store Identity Providers
//!
//! How the process establishes the identity it talks to the store as.

use std::sync::Mutex;

use uuid::Uuid;

use crate::store::{StoreError, StoreFuture};

/// Source of the process-wide store identity
pub trait AuthProvider: Send + Sync {
    /// Identity already established, if any
    fn current_identity(&self) -> Option<String>;

    /// Establish an identity, returning it
    fn sign_in(&self) -> StoreFuture<'_, String>;
}

/// Anonymous sign-in: a fresh opaque identity per process
#[derive(Debug, Default)]
pub struct AnonymousAuth {
    identity: Mutex<Option<String>>,
}

impl AnonymousAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthProvider for AnonymousAuth {
    fn current_identity(&self) -> Option<String> {
        self.identity.lock().ok().and_then(|guard| guard.clone())
    }

    fn sign_in(&self) -> StoreFuture<'_, String> {
        let result = match self.identity.lock() {
            Ok(mut guard) => {
                let identity = guard
                    .get_or_insert_with(|| format!("anon-{}", Uuid::new_v4().simple()))
                    .clone();
                Ok(identity)
            }
            Err(_) => Err(StoreError::LockPoisoned),
        };
        Box::pin(async move { result })
    }
}

/// Fixed service identity configured at startup
#[derive(Debug, Clone)]
pub struct ServiceAuth {
    identity: String,
}

impl ServiceAuth {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl AuthProvider for ServiceAuth {
    fn current_identity(&self) -> Option<String> {
        None
    }

    fn sign_in(&self) -> StoreFuture<'_, String> {
        let identity = self.identity.clone();
        Box::pin(async move { Ok(identity) })
    }
}

/// Authentication disabled; every sign-in attempt fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn current_identity(&self) -> Option<String> {
        None
    }

    fn sign_in(&self) -> StoreFuture<'_, String> {
        Box::pin(async { Err(StoreError::Unavailable("authentication disabled".to_string())) })
    }
}
