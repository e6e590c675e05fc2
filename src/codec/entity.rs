//! # Entity Decoding
//!
//! Raw store records to typed entities. Decoding is lenient about legacy
//! shapes and absent fields, strict only where a value cannot be used at all.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::errors::{CodecError, CodecResult};
use super::timestamp::decode_timestamp_field;
use crate::model::{normalize_profile, Article, Block, Comment, Report, ReportStatus, User};
use crate::store::StoredDocument;

/// Field holding the legacy numeric id
pub const LEGACY_ID_FIELD: &str = "legacyId";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    is_public: Option<bool>,
    access_key: Option<String>,
    is_archived: Option<bool>,
    cover_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    email: Option<String>,
    username: Option<String>,
    banner_url: Option<String>,
    bio: Option<String>,
    password: Option<String>,
    password_hash: Option<String>,
    is_profile_complete: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    reason: Option<String>,
    status: Option<String>,
}

fn parse_raw<T: DeserializeOwned>(kind: &'static str, doc: &StoredDocument) -> CodecResult<T> {
    if !doc.data.is_object() {
        return Err(CodecError::NotAnObject {
            kind,
            key: doc.key.clone(),
        });
    }
    T::deserialize(&doc.data).map_err(|e| CodecError::Malformed {
        kind,
        key: doc.key.clone(),
        reason: e.to_string(),
    })
}

/// Integer stored either as a number or a numeric string
pub fn integer_field(data: &Value, field: &str) -> Option<i64> {
    match data.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reference stored either as a string or a bare number
pub fn reference_field(data: &Value, field: &str) -> Option<String> {
    match data.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_blocks(raw: Option<&Value>) -> Vec<Block> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| Block::deserialize(item).ok())
            .collect(),
        // Bodies written before the block editor were plain text
        Some(Value::String(text)) if !text.is_empty() => vec![Block::paragraph(text.clone())],
        _ => Vec::new(),
    }
}

fn decode_tags(raw: Option<&Value>) -> BTreeSet<String> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_counter(raw: Option<&Value>) -> u64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Decode an article. `id` is always the storage key.
///
/// Optional fields (`legacyId`, `accessKey`, `coverImage`, timestamps) stay
/// `None` when absent. The rest default because a read path consumes them
/// unconditionally:
/// - `title`, `authorId`, `content`, `tags`: rendered and matched on by
///   every listing, so absent reads as empty
/// - `isPublic`: records older than the privacy flag were all public
/// - `isArchived`: view filtering, absent means never archived
/// - `views`: `increment_views` adds to it, absent counts as 0
pub fn decode_article(doc: &StoredDocument) -> CodecResult<Article> {
    let raw: RawArticle = parse_raw("article", doc)?;
    let data = &doc.data;

    Ok(Article {
        id: doc.key.clone(),
        legacy_id: integer_field(data, LEGACY_ID_FIELD),
        title: raw.title.unwrap_or_default(),
        content: decode_blocks(data.get("content")),
        author_id: reference_field(data, "authorId").unwrap_or_default(),
        is_public: raw.is_public.unwrap_or(true),
        access_key: raw.access_key,
        is_archived: raw.is_archived.unwrap_or(false),
        cover_image: raw.cover_image,
        tags: decode_tags(data.get("tags")),
        views: decode_counter(data.get("views")),
        created_at: decode_timestamp_field(data, "createdAt"),
        updated_at: decode_timestamp_field(data, "updatedAt"),
    })
}

/// Decode a user, normalizing profile field variants
pub fn decode_user(doc: &StoredDocument) -> CodecResult<User> {
    let raw: RawUser = parse_raw("user", doc)?;
    let username = raw.username.unwrap_or_default();
    let profile = normalize_profile(&doc.data, &username);

    Ok(User {
        id: doc.key.clone(),
        email: raw.email.unwrap_or_default(),
        display_name: profile.display_name,
        avatar_url: profile.avatar_url,
        username,
        banner_url: raw.banner_url,
        bio: raw.bio,
        password_hash: raw.password_hash.or(raw.password),
        is_profile_complete: raw.is_profile_complete.unwrap_or(false),
        created_at: decode_timestamp_field(&doc.data, "createdAt"),
        updated_at: decode_timestamp_field(&doc.data, "updatedAt"),
    })
}

/// Decode a comment
pub fn decode_comment(doc: &StoredDocument) -> CodecResult<Comment> {
    let raw: RawComment = parse_raw("comment", doc)?;
    let data = &doc.data;

    Ok(Comment {
        id: doc.key.clone(),
        legacy_id: integer_field(data, LEGACY_ID_FIELD),
        article_id: reference_field(data, "articleId").unwrap_or_default(),
        user_id: reference_field(data, "userId").unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        parent_id: integer_field(data, "parentId"),
        created_at: decode_timestamp_field(data, "createdAt"),
    })
}

/// Decode a report. Unknown status strings read as pending.
pub fn decode_report(doc: &StoredDocument) -> CodecResult<Report> {
    let raw: RawReport = parse_raw("report", doc)?;
    let data = &doc.data;
    let status = raw
        .status
        .as_deref()
        .and_then(|s| s.parse::<ReportStatus>().ok())
        .unwrap_or(ReportStatus::Pending);

    Ok(Report {
        id: doc.key.clone(),
        article_id: reference_field(data, "articleId").unwrap_or_default(),
        reporter_id: reference_field(data, "reporterId").unwrap_or_default(),
        reason: raw.reason.unwrap_or_default(),
        status,
        created_at: decode_timestamp_field(data, "createdAt"),
    })
}
