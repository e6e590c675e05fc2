//! # Views
//!
//! A view is a named selection over the full article set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DataError;
use crate::model::Article;

/// Named article selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Every non-archived article, public or private
    Public,
    /// The viewer's own articles, archived included.
    ///
    /// Callers rendering a non-archived listing filter on
    /// [`Article::is_archived`] themselves.
    Mine,
    /// Non-archived articles for a signed-in viewer
    Feed,
    /// Non-archived articles the viewer bookmarked
    Bookmarks,
}

impl View {
    pub const ALL: [View; 4] = [View::Public, View::Mine, View::Feed, View::Bookmarks];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Public => "public",
            View::Mine => "mine",
            View::Feed => "feed",
            View::Bookmarks => "bookmarks",
        }
    }

    /// Views that are empty without a viewer
    pub fn requires_viewer(&self) -> bool {
        !matches!(self, View::Public)
    }

    /// Pre-enrichment predicate
    pub fn admits(&self, article: &Article, viewer: Option<&str>) -> bool {
        match self {
            View::Public | View::Bookmarks => !article.is_archived,
            // TODO: restrict to authors the viewer follows once the follow graph is wired in
            View::Feed => !article.is_archived,
            View::Mine => viewer.is_some_and(|v| article.is_owned_by(v)),
        }
    }

    /// Whether rows are dropped after enrichment unless bookmarked by the viewer
    pub fn requires_bookmark(&self) -> bool {
        matches!(self, View::Bookmarks)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for View {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| DataError::validation(format!("unknown view '{}'", s)))
    }
}
