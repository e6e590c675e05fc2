//! Likes, bookmarks and follows

use super::{require_text, ContentService};
use crate::engagement::{EngagementKind, Subject};
use crate::errors::{DataError, DataResult};
use crate::identity::EntityRef;

impl ContentService {
    /// Flip the actor's like. Returns `true` if the article is now liked.
    pub async fn toggle_like(&self, article: &EntityRef, actor: &str) -> DataResult<bool> {
        self.toggle_article(EngagementKind::Like, article, actor).await
    }

    /// Flip the actor's bookmark. Returns `true` if now bookmarked.
    pub async fn toggle_bookmark(&self, article: &EntityRef, actor: &str) -> DataResult<bool> {
        self.toggle_article(EngagementKind::Bookmark, article, actor)
            .await
    }

    /// Flip whether the actor follows `user`. Following yourself is rejected.
    pub async fn toggle_follow(&self, user: &EntityRef, actor: &str) -> DataResult<bool> {
        self.gate.ready().await;
        require_text("actor", actor, None)?;
        let subject = self.user_subject(user).await?;
        if subject.key() == actor {
            return Err(DataError::validation("cannot follow yourself"));
        }
        let engaged = self
            .engagement
            .toggle(EngagementKind::Follow, &subject, actor)
            .await?;
        self.metrics.increment_engagement_toggles();
        Ok(engaged)
    }

    /// Number of likes on an article
    pub async fn get_article_likes(&self, article: &EntityRef) -> DataResult<u64> {
        self.gate.ready().await;
        let subject = self.article_subject(article).await?;
        self.engagement.count(EngagementKind::Like, &subject).await
    }

    pub async fn has_liked(&self, article: &EntityRef, actor: &str) -> DataResult<bool> {
        self.gate.ready().await;
        let subject = self.article_subject(article).await?;
        self.engagement
            .exists(EngagementKind::Like, &subject, actor)
            .await
    }

    pub async fn has_bookmarked(&self, article: &EntityRef, actor: &str) -> DataResult<bool> {
        self.gate.ready().await;
        let subject = self.article_subject(article).await?;
        self.engagement
            .exists(EngagementKind::Bookmark, &subject, actor)
            .await
    }

    /// Whether `actor` follows `user`
    pub async fn is_following(&self, user: &EntityRef, actor: &str) -> DataResult<bool> {
        self.gate.ready().await;
        let subject = self.user_subject(user).await?;
        self.engagement
            .exists(EngagementKind::Follow, &subject, actor)
            .await
    }

    /// Number of users following `user`
    pub async fn follower_count(&self, user: &EntityRef) -> DataResult<u64> {
        self.gate.ready().await;
        let subject = self.user_subject(user).await?;
        self.engagement
            .count(EngagementKind::Follow, &subject)
            .await
    }

    /// Number of users `user` follows
    pub async fn following_count(&self, user: &EntityRef) -> DataResult<u64> {
        self.gate.ready().await;
        let subject = self.user_subject(user).await?;
        self.engagement
            .count_by_actor(EngagementKind::Follow, subject.key())
            .await
    }

    async fn toggle_article(
        &self,
        kind: EngagementKind,
        article: &EntityRef,
        actor: &str,
    ) -> DataResult<bool> {
        self.gate.ready().await;
        require_text("actor", actor, None)?;
        let subject = self.article_subject(article).await?;
        let engaged = self.engagement.toggle(kind, &subject, actor).await?;
        self.metrics.increment_engagement_toggles();
        Ok(engaged)
    }

    async fn user_subject(&self, user: &EntityRef) -> DataResult<Subject> {
        let user = self
            .users
            .find(user)
            .await?
            .ok_or_else(|| DataError::not_found(format!("user {}", user)))?;
        Ok(Subject::new(user.id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::errors::DataError;
    use crate::gate::ServiceAuth;
    use crate::identity::EntityRef;
    use crate::model::NewArticle;
    use crate::service::ContentService;
    use crate::store::{DocumentStore, MemoryStore};

    async fn service() -> ContentService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        store.set("users", "u1", json!({"username": "ada"})).await.unwrap();
        store.set("users", "u2", json!({"username": "bob"})).await.unwrap();
        ContentService::new(store, Arc::new(ServiceAuth::new("svc")))
    }

    #[tokio::test]
    async fn test_like_twice_returns_to_zero() {
        let service = service().await;
        let article = service.create_article(NewArticle::titled("A"), "u1").await.unwrap();
        let reference = EntityRef::parse(&article.id);

        assert!(service.toggle_like(&reference, "u1").await.unwrap());
        assert_eq!(service.get_article_likes(&reference).await.unwrap(), 1);
        assert!(service.has_liked(&reference, "u1").await.unwrap());

        assert!(!service.toggle_like(&reference, "u1").await.unwrap());
        assert_eq!(service.get_article_likes(&reference).await.unwrap(), 0);
        assert!(!service.has_liked(&reference, "u1").await.unwrap());
        assert_eq!(service.metrics().engagement_toggles, 2);
    }

    #[tokio::test]
    async fn test_like_by_legacy_id_matches_key() {
        let service = service().await;
        let article = service.create_article(NewArticle::titled("A"), "u1").await.unwrap();

        service.toggle_like(&EntityRef::ByLegacyId(1), "u2").await.unwrap();
        assert!(service
            .has_liked(&EntityRef::parse(&article.id), "u2")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_toggle_on_missing_article() {
        let service = service().await;
        assert!(matches!(
            service.toggle_bookmark(&EntityRef::parse("ghost"), "u1").await,
            Err(DataError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_counts_and_self_follow() {
        let service = service().await;
        let u1 = EntityRef::parse("u1");
        let u2 = EntityRef::parse("u2");

        assert!(service.toggle_follow(&u1, "u2").await.unwrap());
        assert!(service.is_following(&u1, "u2").await.unwrap());
        assert_eq!(service.follower_count(&u1).await.unwrap(), 1);
        assert_eq!(service.following_count(&u2).await.unwrap(), 1);
        assert_eq!(service.following_count(&u1).await.unwrap(), 0);

        assert!(matches!(
            service.toggle_follow(&u1, "u1").await,
            Err(DataError::Validation(_))
        ));
    }
}
