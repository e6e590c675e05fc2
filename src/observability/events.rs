//! Observable events of the content core

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ConfigLoaded,
    ServerStart,
    ServerStop,

    // Readiness gate
    /// Store identity established
    GateReady,
    /// Identity could not be established; continuing unauthenticated
    GateAuthFailed,

    // Identity resolution
    /// Reference found through the legacy numeric id
    LegacyIdFallback,
    /// More than one record carries the same legacy id
    DuplicateLegacyId,
    /// Direct key lookup failed and a fallback was attempted
    KeyLookupFailed,

    // Feeds
    FeedAssembled,
    /// Full-collection read failed; an empty list was returned
    FeedReadFailed,
    /// Record skipped because it could not be decoded
    RecordSkipped,
    /// Author placeholder substituted for a dangling reference
    AuthorFallback,
    /// Engagement lookup failed for one row
    EngagementDegraded,

    // Writes
    ArticleCreated,
    ArticleUpdated,
    ArticleDeleted,
    CascadeFailed,
    EngagementToggled,
    CommentCreated,
    CommentDeleted,
    ReportCreated,
    ReportUpdated,
    ReportDeleted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::GateReady => "GATE_READY",
            Event::GateAuthFailed => "GATE_AUTH_FAILED",
            Event::LegacyIdFallback => "LEGACY_ID_FALLBACK",
            Event::DuplicateLegacyId => "DUPLICATE_LEGACY_ID",
            Event::KeyLookupFailed => "KEY_LOOKUP_FAILED",
            Event::FeedAssembled => "FEED_ASSEMBLED",
            Event::FeedReadFailed => "FEED_READ_FAILED",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::AuthorFallback => "AUTHOR_FALLBACK",
            Event::EngagementDegraded => "ENGAGEMENT_DEGRADED",
            Event::ArticleCreated => "ARTICLE_CREATED",
            Event::ArticleUpdated => "ARTICLE_UPDATED",
            Event::ArticleDeleted => "ARTICLE_DELETED",
            Event::CascadeFailed => "CASCADE_FAILED",
            Event::EngagementToggled => "ENGAGEMENT_TOGGLED",
            Event::CommentCreated => "COMMENT_CREATED",
            Event::CommentDeleted => "COMMENT_DELETED",
            Event::ReportCreated => "REPORT_CREATED",
            Event::ReportUpdated => "REPORT_UPDATED",
            Event::ReportDeleted => "REPORT_DELETED",
        }
    }

    /// Events that indicate degraded service rather than normal flow
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Event::GateAuthFailed
                | Event::DuplicateLegacyId
                | Event::KeyLookupFailed
                | Event::FeedReadFailed
                | Event::RecordSkipped
                | Event::AuthorFallback
                | Event::EngagementDegraded
                | Event::CascadeFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
