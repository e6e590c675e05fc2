//! # User Directory
//!
//! User lookups by reference, username and email.

use std::sync::Arc;

use serde_json::Value;

use super::reference::EntityRef;
use super::resolver::IdentityResolver;
use crate::codec::decode_user;
use crate::errors::DataResult;
use crate::model::{collections, User};
use crate::store::DocumentStore;

/// Read access to the users collection
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn DocumentStore>,
    resolver: IdentityResolver,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>, resolver: IdentityResolver) -> Self {
        Self { store, resolver }
    }

    /// Look up a user by key or legacy id
    pub async fn find(&self, reference: &EntityRef) -> DataResult<Option<User>> {
        match self.resolver.resolve(collections::USERS, reference).await? {
            Some(doc) => Ok(Some(decode_user(&doc)?)),
            None => Ok(None),
        }
    }

    /// Look up a user by exact (case-sensitive) username
    pub async fn find_by_username(&self, username: &str) -> DataResult<Option<User>> {
        self.find_by_field("username", username).await
    }

    /// Look up a user by exact email
    pub async fn find_by_email(&self, email: &str) -> DataResult<Option<User>> {
        self.find_by_field("email", email).await
    }

    async fn find_by_field(&self, field: &str, value: &str) -> DataResult<Option<User>> {
        let needle = Value::String(value.to_string());
        let hits = self.store.find_eq(collections::USERS, field, &needle).await?;
        match hits.first() {
            Some(doc) => Ok(Some(decode_user(doc)?)),
            None => Ok(None),
        }
    }
}
