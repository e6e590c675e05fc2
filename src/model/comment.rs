//! # Comment Model
//!
//! Comments nest one level deep: a reply's parent is always top-level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::author::Author;

/// Comment as stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Storage key
    pub id: String,
    pub legacy_id: Option<i64>,
    pub article_id: String,
    pub user_id: String,
    pub content: String,
    /// Legacy id of the top-level comment this replies to
    pub parent_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Comment with its author and, for top-level comments, its replies
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Author,
    pub replies: Vec<EnrichedComment>,
}

/// Input for comment creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Article reference, storage key or legacy id
    pub article_ref: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}
