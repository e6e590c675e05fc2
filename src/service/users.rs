//! User lookups

use super::ContentService;
use crate::errors::{DataError, DataResult};
use crate::identity::EntityRef;
use crate::model::User;

impl ContentService {
    pub async fn get_user(&self, reference: &EntityRef) -> DataResult<User> {
        self.gate.ready().await;
        self.users
            .find(reference)
            .await?
            .ok_or_else(|| DataError::not_found(format!("user {}", reference)))
    }

    /// Exact, case-sensitive username match
    pub async fn get_user_by_username(&self, username: &str) -> DataResult<User> {
        self.gate.ready().await;
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DataError::not_found(format!("user @{}", username)))
    }

    pub async fn get_user_by_email(&self, email: &str) -> DataResult<User> {
        self.gate.ready().await;
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DataError::not_found(format!("user <{}>", email)))
    }
}
