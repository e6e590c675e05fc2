//! # Author Projection
//!
//! The slice of a user attached to articles and comments.

use serde::Serialize;

use super::user::User;

/// Username given to the placeholder for a dangling author reference
pub const UNKNOWN_USERNAME: &str = "unknown_user";

/// Author as rendered next to content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Author {
    /// Placeholder for an author record that no longer resolves
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: UNKNOWN_USERNAME.to_string(),
            display_name: "Unknown User".to_string(),
            avatar_url: None,
        }
    }

    /// Whether this is the placeholder rather than a real user
    pub fn is_placeholder(&self) -> bool {
        self.username == UNKNOWN_USERNAME
    }
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}
