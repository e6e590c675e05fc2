//! # Content Model
//!
//! Typed entities returned by the content core, and the collection layout
//! they are stored in.

pub mod article;
pub mod author;
pub mod comment;
pub mod report;
pub mod user;

pub use article::{Article, ArticlePatch, Block, EnrichedArticle, NewArticle};
pub use author::{Author, UNKNOWN_USERNAME};
pub use comment::{Comment, EnrichedComment, NewComment};
pub use report::{NewReport, Report, ReportStatus};
pub use user::{normalize_profile, Profile, User};

/// Collection names. One flat collection per entity kind.
pub mod collections {
    pub const ARTICLES: &str = "articles";
    pub const USERS: &str = "users";
    pub const COMMENTS: &str = "comments";
    pub const LIKES: &str = "likes";
    pub const BOOKMARKS: &str = "bookmarks";
    pub const FOLLOWS: &str = "follows";
    pub const REPORTS: &str = "reports";
    pub const COUNTERS: &str = "counters";
}
