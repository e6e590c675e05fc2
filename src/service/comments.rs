//! Comment operations

use std::collections::{BTreeMap, HashSet};

use futures_util::future::join_all;
use serde_json::{Map, Value};

use super::articles::document_subject;
use super::{require_text, ContentService};
use crate::codec::{decode_comment, integer_field, LEGACY_ID_FIELD};
use crate::engagement::Subject;
use crate::errors::{DataError, DataResult};
use crate::identity::EntityRef;
use crate::model::{collections, Comment, EnrichedComment, NewComment};
use crate::observability::{log_event, Event};
use crate::sequence::SequenceKind;
use crate::store::{server_timestamp, StoreResult, StoredDocument};

impl ContentService {
    /// Comments on an article, oldest first, replies grouped under their
    /// parent. Never fails; a failed read is empty.
    pub async fn list_comments(&self, article: &EntityRef) -> Vec<EnrichedComment> {
        self.gate.ready().await;
        let subject = match self.resolver.resolve(collections::ARTICLES, article).await {
            Ok(Some(doc)) => document_subject(&doc),
            Ok(None) => Subject::new(article.key()),
            Err(e) => {
                let reason = e.to_string();
                log_event(
                    Event::FeedReadFailed,
                    &[("collection", collections::COMMENTS), ("error", reason.as_str())],
                );
                return Vec::new();
            }
        };

        let documents = match self.article_comments(&subject).await {
            Ok(documents) => documents,
            Err(e) => {
                self.metrics.increment_feed_failures();
                let reason = e.to_string();
                log_event(
                    Event::FeedReadFailed,
                    &[("collection", collections::COMMENTS), ("error", reason.as_str())],
                );
                return Vec::new();
            }
        };

        let mut comments: Vec<Comment> = documents
            .iter()
            .filter_map(|doc| match decode_comment(doc) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    let reason = e.to_string();
                    log_event(Event::RecordSkipped, &[("error", reason.as_str())]);
                    None
                }
            })
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let authors = join_all(comments.iter().map(|c| self.feed.author_of(&c.user_id))).await;
        let rows = comments
            .into_iter()
            .zip(authors)
            .map(|(comment, author)| EnrichedComment {
                comment,
                author,
                replies: Vec::new(),
            })
            .collect();
        thread_replies(rows)
    }

    /// Comment by storage key or legacy id
    pub async fn get_comment(&self, reference: &EntityRef) -> DataResult<Comment> {
        self.gate.ready().await;
        let doc = self
            .resolver
            .resolve(collections::COMMENTS, reference)
            .await?
            .ok_or_else(|| DataError::not_found(format!("comment {}", reference)))?;
        Ok(decode_comment(&doc)?)
    }

    /// Create a comment or a reply to a top-level comment on the same article
    pub async fn create_comment(&self, input: NewComment) -> DataResult<Comment> {
        self.gate.ready().await;
        require_text("userId", &input.user_id, None)?;
        require_text("content", &input.content, Some(self.limits.max_comment_length))?;

        let article = self
            .require_article(&EntityRef::parse(&input.article_ref))
            .await?;
        let subject = document_subject(&article);

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .resolver
                .find_by_legacy_id(collections::COMMENTS, parent_id)
                .await?
                .ok_or_else(|| {
                    DataError::validation(format!("parent comment #{} not found", parent_id))
                })?;
            let parent = decode_comment(&parent)?;
            if !subject.all_keys().any(|key| key == parent.article_id) {
                return Err(DataError::validation(
                    "parent comment belongs to another article",
                ));
            }
            if parent.is_reply() {
                return Err(DataError::validation("replies cannot be nested"));
            }
        }

        let legacy_id = self.sequence.next_id(SequenceKind::Comments).await?;

        let mut record = Map::new();
        record.insert(LEGACY_ID_FIELD.to_string(), Value::from(legacy_id));
        record.insert("articleId".to_string(), Value::from(subject.key()));
        record.insert("userId".to_string(), Value::from(input.user_id.as_str()));
        record.insert("content".to_string(), Value::from(input.content.trim()));
        let parent = match input.parent_id {
            Some(parent_id) => Value::from(parent_id),
            None => Value::Null,
        };
        record.insert("parentId".to_string(), parent);
        record.insert("createdAt".to_string(), server_timestamp());

        let key = self
            .store
            .insert(collections::COMMENTS, Value::Object(record))
            .await?;
        let comment = self
            .reread(collections::COMMENTS, &key, decode_comment)
            .await?;

        log_event(
            Event::CommentCreated,
            &[("article", subject.key()), ("id", key.as_str())],
        );
        Ok(comment)
    }

    /// Delete a comment and its direct replies. Deleting an absent comment
    /// succeeds.
    pub async fn delete_comment(&self, reference: &EntityRef) -> DataResult<()> {
        self.gate.ready().await;
        let Some(doc) = self.resolver.resolve(collections::COMMENTS, reference).await? else {
            return Ok(());
        };
        self.store.delete(collections::COMMENTS, &doc.key).await?;

        let mut replies = 0usize;
        let top_level = integer_field(&doc.data, "parentId").is_none();
        if let (true, Some(legacy_id)) = (top_level, integer_field(&doc.data, LEGACY_ID_FIELD)) {
            for needle in [Value::from(legacy_id), Value::from(legacy_id.to_string())] {
                for reply in self
                    .store
                    .find_eq(collections::COMMENTS, "parentId", &needle)
                    .await?
                {
                    if self.store.delete(collections::COMMENTS, &reply.key).await? {
                        replies += 1;
                    }
                }
            }
        }

        let replies = replies.to_string();
        log_event(
            Event::CommentDeleted,
            &[("id", doc.key.as_str()), ("replies", replies.as_str())],
        );
        Ok(())
    }

    /// Delete every comment on an article. Returns how many were removed.
    pub(super) async fn remove_article_comments(&self, subject: &Subject) -> DataResult<usize> {
        let mut removed = 0;
        for doc in self.article_comments(subject).await? {
            if self.store.delete(collections::COMMENTS, &doc.key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn article_comments(&self, subject: &Subject) -> StoreResult<Vec<StoredDocument>> {
        let mut by_key = BTreeMap::new();
        for key in subject.all_keys() {
            let needle = Value::String(key.to_string());
            for doc in self
                .store
                .find_eq(collections::COMMENTS, "articleId", &needle)
                .await?
            {
                by_key.insert(doc.key.clone(), doc);
            }
        }
        Ok(by_key.into_values().collect())
    }
}

/// Move replies under their top-level parent, keeping relative order.
/// Replies whose parent is gone stay at the top level.
fn thread_replies(rows: Vec<EnrichedComment>) -> Vec<EnrichedComment> {
    let parents: HashSet<i64> = rows
        .iter()
        .filter(|row| !row.comment.is_reply())
        .filter_map(|row| row.comment.legacy_id)
        .collect();

    let (mut top, replies): (Vec<_>, Vec<_>) = rows.into_iter().partition(|row| {
        row.comment
            .parent_id
            .map_or(true, |parent| !parents.contains(&parent))
    });

    for reply in replies {
        let position = top.iter().position(|row| {
            !row.comment.is_reply() && row.comment.legacy_id == reply.comment.parent_id
        });
        match position {
            Some(index) => top[index].replies.push(reply),
            None => top.push(reply),
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::errors::DataError;
    use crate::gate::ServiceAuth;
    use crate::identity::EntityRef;
    use crate::model::{NewArticle, NewComment};
    use crate::service::{ContentService, Limits};
    use crate::store::{DocumentStore, MemoryStore};

    async fn fixture() -> (ContentService, Arc<dyn DocumentStore>, String) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        store.set("users", "u1", json!({"username": "ada"})).await.unwrap();
        let limits = Limits {
            max_comment_length: 20,
            ..Limits::default()
        };
        let service =
            ContentService::with_limits(Arc::clone(&store), Arc::new(ServiceAuth::new("svc")), limits);
        let article = service.create_article(NewArticle::titled("A"), "u1").await.unwrap();
        (service, store, article.id)
    }

    fn comment(article: &str, content: &str, parent_id: Option<i64>) -> NewComment {
        NewComment {
            article_ref: article.to_string(),
            user_id: "u1".to_string(),
            content: content.to_string(),
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_replies_are_threaded() {
        let (service, _, article) = fixture().await;
        let first = service.create_comment(comment(&article, "first", None)).await.unwrap();
        service.create_comment(comment(&article, "second", None)).await.unwrap();
        service
            .create_comment(comment(&article, "reply", first.legacy_id))
            .await
            .unwrap();

        // Legacy article reference reaches the same comments
        let listed = service.list_comments(&EntityRef::ByLegacyId(1)).await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].comment.content, "first");
        assert_eq!(listed[0].replies.len(), 1);
        assert_eq!(listed[0].replies[0].comment.content, "reply");
        assert_eq!(listed[0].author.username, "ada");
        assert!(listed[1].replies.is_empty());
    }

    #[tokio::test]
    async fn test_comment_validation() {
        let (service, _, article) = fixture().await;
        let top = service.create_comment(comment(&article, "top", None)).await.unwrap();
        let reply = service
            .create_comment(comment(&article, "reply", top.legacy_id))
            .await
            .unwrap();

        for input in [
            comment(&article, "   ", None),
            comment(&article, "this comment is far too long", None),
            comment(&article, "orphan", Some(404)),
            comment(&article, "nested", reply.legacy_id),
        ] {
            assert!(matches!(
                service.create_comment(input).await,
                Err(DataError::Validation(_))
            ));
        }
        assert!(matches!(
            service.create_comment(comment("ghost", "hi", None)).await,
            Err(DataError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_parent_on_other_article_rejected() {
        let (service, _, article) = fixture().await;
        let other = service.create_article(NewArticle::titled("B"), "u1").await.unwrap();
        let top = service.create_comment(comment(&article, "top", None)).await.unwrap();

        assert!(matches!(
            service
                .create_comment(comment(&other.id, "cross", top.legacy_id))
                .await,
            Err(DataError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_direct_replies() {
        let (service, store, article) = fixture().await;
        let top = service.create_comment(comment(&article, "top", None)).await.unwrap();
        service
            .create_comment(comment(&article, "reply", top.legacy_id))
            .await
            .unwrap();
        let keep = service.create_comment(comment(&article, "keep", None)).await.unwrap();

        service.delete_comment(&EntityRef::parse(&top.id)).await.unwrap();
        service.delete_comment(&EntityRef::parse(&top.id)).await.unwrap();

        let remaining = store.scan("comments").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key, keep.id);
    }

    #[tokio::test]
    async fn test_dangling_comment_author() {
        let (service, store, article) = fixture().await;
        store
            .insert(
                "comments",
                json!({"articleId": article, "userId": "gone", "content": "hi", "parentId": null}),
            )
            .await
            .unwrap();

        let listed = service.list_comments(&EntityRef::parse(&article)).await;
        assert_eq!(listed.len(), 1);
        assert!(listed[0].author.is_placeholder());
    }
}
