//! # Engagement Kinds and Subjects

use std::fmt;

use crate::model::{collections, Article};

/// A directed relationship between an actor and a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementKind {
    /// Actor likes an article
    Like,
    /// Actor bookmarked an article
    Bookmark,
    /// Actor follows a user
    Follow,
}

impl EngagementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementKind::Like => "like",
            EngagementKind::Bookmark => "bookmark",
            EngagementKind::Follow => "follow",
        }
    }

    /// Collection holding records of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            EngagementKind::Like => collections::LIKES,
            EngagementKind::Bookmark => collections::BOOKMARKS,
            EngagementKind::Follow => collections::FOLLOWS,
        }
    }

    /// Field naming the subject
    pub fn subject_field(&self) -> &'static str {
        match self {
            EngagementKind::Like | EngagementKind::Bookmark => "articleId",
            EngagementKind::Follow => "followingId",
        }
    }

    /// Field naming the actor
    pub fn actor_field(&self) -> &'static str {
        match self {
            EngagementKind::Like | EngagementKind::Bookmark => "userId",
            EngagementKind::Follow => "followerId",
        }
    }
}

impl fmt::Display for EngagementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The subject side of an engagement pair.
///
/// Records written before storage keys existed name the subject by its
/// legacy id; those are matched through aliases. New records always use
/// the canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    key: String,
    aliases: Vec<String>,
}

impl Subject {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            aliases: Vec::new(),
        }
    }

    /// Also match records that name the subject as `alias`
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.key && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Canonical key written into new records
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical key followed by every alias
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl From<&Article> for Subject {
    fn from(article: &Article) -> Self {
        let subject = Subject::new(article.id.clone());
        match article.legacy_id {
            Some(id) => subject.with_alias(id.to_string()),
            None => subject,
        }
    }
}
