//! # Article Model

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::author::Author;

/// One unit of article body (paragraph, heading, image, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl Block {
    /// Plain paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: "paragraph".to_string(),
            data: serde_json::json!({ "text": text.into() }),
        }
    }
}

/// Article as returned to callers
///
/// `id` is always the storage key, whichever identifier was used to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<i64>,
    pub title: String,
    pub content: Vec<Block>,
    pub author_id: String,
    pub is_public: bool,
    pub access_key: Option<String>,
    pub is_archived: bool,
    pub cover_image: Option<String>,
    pub tags: BTreeSet<String>,
    pub views: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Whether `actor` owns this article
    pub fn is_owned_by(&self, actor: &str) -> bool {
        self.author_id == actor
    }
}

/// Article with per-viewer and aggregate data attached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub author: Author,
    pub like_count: u64,
    pub is_liked: bool,
    pub is_bookmarked: bool,
}

/// Input for article creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub content: Vec<Block>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

fn default_public() -> bool {
    true
}

impl NewArticle {
    /// Minimal public article
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_public: true,
            ..Default::default()
        }
    }
}

/// Partial article update. Only `Some` fields are written.
///
/// For nullable fields the outer `Option` selects whether to write, the inner
/// one whether to clear.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<Vec<Block>>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub access_key: Option<Option<String>>,
    pub is_archived: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub tags: Option<BTreeSet<String>>,
}

impl ArticlePatch {
    /// Patch that only flips the archive flag
    pub fn archived(archived: bool) -> Self {
        Self {
            is_archived: Some(archived),
            ..Default::default()
        }
    }

    /// Whether the patch writes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_public.is_none()
            && self.access_key.is_none()
            && self.is_archived.is_none()
            && self.cover_image.is_none()
            && self.tags.is_none()
    }
}

// A present `null` must stay distinguishable from an absent field
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
