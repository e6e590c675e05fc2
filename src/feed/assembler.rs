//! # Feed Assembler
//!
//! Full read of the articles collection, in-memory filtering by view,
//! newest-first ordering, then per-row enrichment with the author
//! projection and engagement state.
//!
//! Nothing is cached between calls. A failed full read yields an empty
//! list; a failed lookup while enriching one row degrades only that row.

use std::sync::Arc;

use futures_util::future::join_all;

use super::view::View;
use crate::codec::decode_article;
use crate::engagement::{EngagementKind, EngagementStore, Subject};
use crate::identity::{EntityRef, UserDirectory};
use crate::model::{collections, Article, Author, EnrichedArticle};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::store::DocumentStore;

/// Order articles newest first; undated articles sort last
pub fn order_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Builds enriched article lists
#[derive(Clone)]
pub struct FeedAssembler {
    store: Arc<dyn DocumentStore>,
    users: UserDirectory,
    engagement: EngagementStore,
    metrics: Arc<MetricsRegistry>,
}

impl FeedAssembler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        users: UserDirectory,
        engagement: EngagementStore,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            store,
            users,
            engagement,
            metrics,
        }
    }

    /// Assemble `view` as seen by `viewer`
    pub async fn assemble(&self, view: View, viewer: Option<&str>) -> Vec<EnrichedArticle> {
        if view.requires_viewer() && viewer.is_none() {
            return Vec::new();
        }

        let documents = match self.store.scan(collections::ARTICLES).await {
            Ok(documents) => documents,
            Err(e) => {
                self.metrics.increment_feed_failures();
                let reason = e.to_string();
                log_event(
                    Event::FeedReadFailed,
                    &[("error", reason.as_str()), ("view", view.as_str())],
                );
                return Vec::new();
            }
        };

        let mut articles: Vec<Article> = documents
            .iter()
            .filter_map(|doc| match decode_article(doc) {
                Ok(article) => Some(article),
                Err(e) => {
                    let reason = e.to_string();
                    log_event(Event::RecordSkipped, &[("error", reason.as_str())]);
                    None
                }
            })
            .filter(|article| view.admits(article, viewer))
            .collect();
        order_newest_first(&mut articles);

        // join_all yields results in input order
        let enriched = join_all(
            articles
                .into_iter()
                .map(|article| self.enrich(article, viewer)),
        )
        .await;

        let result: Vec<EnrichedArticle> = if view.requires_bookmark() {
            enriched.into_iter().filter(|row| row.is_bookmarked).collect()
        } else {
            enriched
        };

        self.metrics.increment_feeds_assembled();
        let count = result.len().to_string();
        log_event(
            Event::FeedAssembled,
            &[("count", count.as_str()), ("view", view.as_str())],
        );
        result
    }

    /// Attach author and engagement data to one article
    pub async fn enrich(&self, article: Article, viewer: Option<&str>) -> EnrichedArticle {
        let subject = Subject::from(&article);
        let author = self.author_of(&article.author_id).await;
        let like_count = match self.engagement.count(EngagementKind::Like, &subject).await {
            Ok(count) => count,
            Err(e) => {
                self.degrade(&article.id, "like_count", &e.to_string());
                0
            }
        };
        let (is_liked, is_bookmarked) = match viewer {
            Some(viewer) => (
                self.flag(EngagementKind::Like, &subject, viewer).await,
                self.flag(EngagementKind::Bookmark, &subject, viewer).await,
            ),
            None => (false, false),
        };

        EnrichedArticle {
            article,
            author,
            like_count,
            is_liked,
            is_bookmarked,
        }
    }

    /// Author projection, or the placeholder if the reference dangles
    pub async fn author_of(&self, author_id: &str) -> Author {
        match self.users.find(&EntityRef::parse(author_id)).await {
            Ok(Some(user)) => Author::from(&user),
            Ok(None) => {
                self.metrics.increment_degraded_rows();
                log_event(Event::AuthorFallback, &[("author", author_id), ("reason", "missing")]);
                Author::unknown(author_id)
            }
            Err(e) => {
                self.metrics.increment_degraded_rows();
                let reason = e.to_string();
                log_event(
                    Event::AuthorFallback,
                    &[("author", author_id), ("reason", reason.as_str())],
                );
                Author::unknown(author_id)
            }
        }
    }

    async fn flag(&self, kind: EngagementKind, subject: &Subject, viewer: &str) -> bool {
        match self.engagement.exists(kind, subject, viewer).await {
            Ok(engaged) => engaged,
            Err(e) => {
                self.degrade(subject.key(), kind.as_str(), &e.to_string());
                false
            }
        }
    }

    fn degrade(&self, article: &str, field: &str, reason: &str) {
        self.metrics.increment_degraded_rows();
        log_event(
            Event::EngagementDegraded,
            &[("article", article), ("error", reason), ("field", field)],
        );
    }
}
