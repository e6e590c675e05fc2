//! Article operations

use serde_json::{Map, Value};

use super::{field_value, require_text, ContentService};
use crate::codec::{decode_article, integer_field, LEGACY_ID_FIELD};
use crate::engagement::{EngagementKind, Subject};
use crate::errors::{DataError, DataResult};
use crate::feed::View;
use crate::identity::EntityRef;
use crate::model::{collections, Article, ArticlePatch, EnrichedArticle, NewArticle};
use crate::observability::{log_event, log_failure, Event};
use crate::sequence::SequenceKind;
use crate::store::{server_timestamp, StoredDocument};

impl ContentService {
    /// Article by storage key or legacy id
    pub async fn get_entity(&self, reference: &EntityRef) -> DataResult<Article> {
        self.gate.ready().await;
        let doc = self.require_article(reference).await?;
        Ok(decode_article(&doc)?)
    }

    /// Single article enriched for `viewer`
    pub async fn get_article(
        &self,
        reference: &EntityRef,
        viewer: Option<&str>,
    ) -> DataResult<EnrichedArticle> {
        let article = self.get_entity(reference).await?;
        Ok(self.feed.enrich(article, viewer).await)
    }

    /// Enriched article list for a view. Never fails; a failed read is empty.
    pub async fn list_articles(&self, view: View, viewer: Option<&str>) -> Vec<EnrichedArticle> {
        self.gate.ready().await;
        self.feed.assemble(view, viewer).await
    }

    /// Create an article, allocating its legacy id
    pub async fn create_article(&self, input: NewArticle, author_id: &str) -> DataResult<Article> {
        self.gate.ready().await;
        require_text("title", &input.title, None)?;
        require_text("authorId", author_id, None)?;

        let legacy_id = self.sequence.next_id(SequenceKind::Articles).await?;

        let mut record = Map::new();
        record.insert(LEGACY_ID_FIELD.to_string(), Value::from(legacy_id));
        record.insert("title".to_string(), Value::from(input.title.trim()));
        record.insert("content".to_string(), field_value(&input.content)?);
        record.insert("authorId".to_string(), Value::from(author_id));
        record.insert("isPublic".to_string(), Value::Bool(input.is_public));
        record.insert("accessKey".to_string(), field_value(&input.access_key)?);
        record.insert("isArchived".to_string(), Value::Bool(false));
        record.insert("coverImage".to_string(), field_value(&input.cover_image)?);
        record.insert("tags".to_string(), field_value(&input.tags)?);
        record.insert("views".to_string(), Value::from(0u64));
        record.insert("createdAt".to_string(), server_timestamp());
        record.insert("updatedAt".to_string(), server_timestamp());

        let key = self
            .store
            .insert(collections::ARTICLES, Value::Object(record))
            .await?;
        let article = self
            .reread(collections::ARTICLES, &key, decode_article)
            .await?;

        self.metrics.increment_articles_created();
        let legacy = legacy_id.to_string();
        log_event(
            Event::ArticleCreated,
            &[("author", author_id), ("id", key.as_str()), ("legacy_id", legacy.as_str())],
        );
        Ok(article)
    }

    /// Merge the provided fields into an article.
    ///
    /// Identity, authorship, creation time and the view counter are never
    /// written here. An empty patch returns the article unchanged.
    pub async fn update_article(
        &self,
        reference: &EntityRef,
        patch: ArticlePatch,
    ) -> DataResult<Article> {
        self.gate.ready().await;
        let doc = self.require_article(reference).await?;
        if patch.is_empty() {
            return Ok(decode_article(&doc)?);
        }

        let mut fields = Map::new();
        if let Some(title) = &patch.title {
            require_text("title", title, None)?;
            fields.insert("title".to_string(), Value::from(title.trim()));
        }
        if let Some(content) = &patch.content {
            fields.insert("content".to_string(), field_value(content)?);
        }
        if let Some(is_public) = patch.is_public {
            fields.insert("isPublic".to_string(), Value::Bool(is_public));
        }
        if let Some(access_key) = &patch.access_key {
            fields.insert("accessKey".to_string(), field_value(access_key)?);
        }
        if let Some(is_archived) = patch.is_archived {
            fields.insert("isArchived".to_string(), Value::Bool(is_archived));
        }
        if let Some(cover_image) = &patch.cover_image {
            fields.insert("coverImage".to_string(), field_value(cover_image)?);
        }
        if let Some(tags) = &patch.tags {
            fields.insert("tags".to_string(), field_value(tags)?);
        }
        fields.insert("updatedAt".to_string(), server_timestamp());

        let written = self
            .store
            .update(collections::ARTICLES, &doc.key, Value::Object(fields))
            .await?;
        if !written {
            return Err(DataError::not_found(format!("article {}", reference)));
        }

        let article = self
            .reread(collections::ARTICLES, &doc.key, decode_article)
            .await?;
        log_event(Event::ArticleUpdated, &[("id", doc.key.as_str())]);
        Ok(article)
    }

    /// Set or clear the soft-delete flag
    pub async fn archive_article(&self, reference: &EntityRef, archived: bool) -> DataResult<Article> {
        self.update_article(reference, ArticlePatch::archived(archived))
            .await
    }

    /// Remove an article and, best effort, its engagement and comments.
    /// Deleting an absent article succeeds.
    pub async fn delete_article(&self, reference: &EntityRef) -> DataResult<()> {
        self.gate.ready().await;
        let Some(doc) = self.resolver.resolve(collections::ARTICLES, reference).await? else {
            return Ok(());
        };

        self.store.delete(collections::ARTICLES, &doc.key).await?;

        let subject = document_subject(&doc);
        for kind in [EngagementKind::Like, EngagementKind::Bookmark] {
            if let Err(e) = self.engagement.remove_subject(kind, &subject).await {
                log_failure(
                    Event::CascadeFailed,
                    &e,
                    &[("article", doc.key.as_str()), ("kind", kind.as_str())],
                );
            }
        }
        if let Err(e) = self.remove_article_comments(&subject).await {
            log_failure(
                Event::CascadeFailed,
                &e,
                &[("article", doc.key.as_str()), ("kind", "comment")],
            );
        }

        log_event(Event::ArticleDeleted, &[("id", doc.key.as_str())]);
        Ok(())
    }

    /// Bump the view counter.
    ///
    /// Read-then-write like the sequence allocator: concurrent increments
    /// of the same article can be lost.
    pub async fn increment_views(&self, reference: &EntityRef) -> DataResult<()> {
        self.gate.ready().await;
        let doc = self.require_article(reference).await?;
        let views = integer_field(&doc.data, "views").unwrap_or(0).max(0);

        let mut fields = Map::new();
        fields.insert("views".to_string(), Value::from(views + 1));
        let written = self
            .store
            .update(collections::ARTICLES, &doc.key, Value::Object(fields))
            .await?;
        if !written {
            return Err(DataError::not_found(format!("article {}", reference)));
        }
        Ok(())
    }

    pub(super) async fn require_article(&self, reference: &EntityRef) -> DataResult<StoredDocument> {
        self.resolver
            .resolve(collections::ARTICLES, reference)
            .await?
            .ok_or_else(|| DataError::not_found(format!("article {}", reference)))
    }

    /// Engagement subject for a resolved article
    pub(super) async fn article_subject(&self, reference: &EntityRef) -> DataResult<Subject> {
        let doc = self.require_article(reference).await?;
        Ok(document_subject(&doc))
    }
}

/// Subject keyed by storage key, aliased by legacy id when present
pub(super) fn document_subject(doc: &StoredDocument) -> Subject {
    let subject = Subject::new(doc.key.clone());
    match integer_field(&doc.data, LEGACY_ID_FIELD) {
        Some(legacy_id) => subject.with_alias(legacy_id.to_string()),
        None => subject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::gate::ServiceAuth;
    use crate::model::Block;
    use crate::store::{DocumentStore, MemoryStore};
    use serde_json::json;

    fn service() -> (ContentService, Arc<dyn DocumentStore>) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let service = ContentService::new(Arc::clone(&store), Arc::new(ServiceAuth::new("svc")));
        (service, store)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_legacy_ids() {
        let (service, _) = service();
        let first = service.create_article(NewArticle::titled("One"), "u1").await.unwrap();
        let second = service.create_article(NewArticle::titled("Two"), "u1").await.unwrap();

        assert_eq!(first.legacy_id, Some(1));
        assert_eq!(second.legacy_id, Some(2));
        assert!(first.created_at.is_some());
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(service.metrics().articles_created, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let (service, _) = service();
        let result = service.create_article(NewArticle::titled("  "), "u1").await;
        assert!(matches!(result, Err(DataError::Validation(_))));
    }

    #[tokio::test]
    async fn test_both_references_give_same_projection() {
        let (service, _) = service();
        let created = service.create_article(NewArticle::titled("T1"), "u1").await.unwrap();

        let by_key = service.get_entity(&EntityRef::parse(&created.id)).await.unwrap();
        let by_legacy = service.get_entity(&EntityRef::ByLegacyId(1)).await.unwrap();
        assert_eq!(by_key, by_legacy);
        assert_eq!(by_legacy.title, "T1");
        assert_eq!(by_legacy.author_id, "u1");
    }

    #[tokio::test]
    async fn test_update_merges_and_preserves_protected_fields() {
        let (service, _) = service();
        let created = service.create_article(NewArticle::titled("Draft"), "u1").await.unwrap();
        let reference = EntityRef::ByLegacyId(1);
        service.increment_views(&reference).await.unwrap();

        let patch = ArticlePatch {
            content: Some(vec![Block::paragraph("body")]),
            cover_image: Some(Some("c.png".to_string())),
            ..Default::default()
        };
        let updated = service.update_article(&reference, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, vec![Block::paragraph("body")]);
        assert_eq!(updated.cover_image.as_deref(), Some("c.png"));
        assert_eq!(updated.views, 1);
        assert_eq!(updated.legacy_id, Some(1));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (service, _) = service();
        let result = service
            .update_article(&EntityRef::parse("nope"), ArticlePatch::archived(true))
            .await;
        assert!(matches!(result, Err(DataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_cascades() {
        let (service, store) = service();
        let article = service.create_article(NewArticle::titled("Gone"), "u1").await.unwrap();
        let reference = EntityRef::parse(&article.id);
        service.toggle_like(&reference, "u2").await.unwrap();
        service.toggle_bookmark(&reference, "u2").await.unwrap();
        store
            .insert("likes", json!({"articleId": "1", "userId": "u3"}))
            .await
            .unwrap();

        service.delete_article(&reference).await.unwrap();
        service.delete_article(&reference).await.unwrap();

        assert!(matches!(
            service.get_entity(&reference).await,
            Err(DataError::NotFound(_))
        ));
        assert!(store.scan("likes").await.unwrap().is_empty());
        assert!(store.scan("bookmarks").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increment_views() {
        let (service, _) = service();
        let article = service.create_article(NewArticle::titled("Seen"), "u1").await.unwrap();
        let reference = EntityRef::parse(&article.id);

        service.increment_views(&reference).await.unwrap();
        service.increment_views(&reference).await.unwrap();
        assert_eq!(service.get_entity(&reference).await.unwrap().views, 2);

        assert!(matches!(
            service.increment_views(&EntityRef::ByLegacyId(99)).await,
            Err(DataError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_archived_hidden_from_public_but_resolvable() {
        let (service, _) = service();
        let article = service.create_article(NewArticle::titled("Old"), "u1").await.unwrap();
        let reference = EntityRef::parse(&article.id);
        service.archive_article(&reference, true).await.unwrap();

        assert!(service.list_articles(View::Public, None).await.is_empty());
        let mine = service.list_articles(View::Mine, Some("u1")).await;
        assert!(mine.iter().all(|row| row.article.is_archived));
        assert!(service.get_entity(&reference).await.unwrap().is_archived);
    }
}
