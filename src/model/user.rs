//! # User Model
//!
//! Users accumulated several field names for the same profile data over
//! time. [`normalize_profile`] folds them into one canonical pair.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Avatar field names, most recent first
pub const AVATAR_FIELDS: &[&str] = &["avatarUrl", "avatar", "photoURL", "profileImage", "image"];

/// Display-name field names, most recent first
pub const DISPLAY_NAME_FIELDS: &[&str] = &["displayName", "display_name", "name", "fullName"];

/// User as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub bio: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_profile_complete: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Canonical avatar/display-name pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Resolve the canonical profile pair from a raw user document.
///
/// The first non-blank value among the known variants wins. A missing
/// display name falls back to the username.
pub fn normalize_profile(raw: &Value, username: &str) -> Profile {
    let display_name = first_non_blank(raw, DISPLAY_NAME_FIELDS)
        .unwrap_or_else(|| username.to_string());
    let avatar_url = first_non_blank(raw, AVATAR_FIELDS);
    Profile {
        display_name,
        avatar_url,
    }
}

fn first_non_blank(raw: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|name| raw.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
