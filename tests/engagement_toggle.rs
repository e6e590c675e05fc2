//! Engagement Toggle Tests
//!
//! The existence of a record is the engaged state; toggling alternates it.

mod common;

use std::sync::Arc;

use common::service_with_users;
use pressroom::engagement::{EngagementKind, EngagementStore, Subject};
use pressroom::identity::EntityRef;
use pressroom::model::NewArticle;
use pressroom::store::{DocumentStore, MemoryStore};
use serde_json::json;

// =============================================================================
// Toggle Semantics
// =============================================================================

#[tokio::test]
async fn test_toggle_alternates_and_exists_tracks_last_result() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let engagement = EngagementStore::new(store);
    let subject = Subject::new("article-1");

    for expected in [true, false, true, false, true] {
        for kind in [EngagementKind::Like, EngagementKind::Bookmark, EngagementKind::Follow] {
            let state = engagement.toggle(kind, &subject, "u1").await.unwrap();
            assert_eq!(state, expected);
            assert_eq!(
                engagement.exists(kind, &subject, "u1").await.unwrap(),
                expected
            );
        }
    }
}

#[tokio::test]
async fn test_like_twice_scenario() {
    let (service, _) = service_with_users().await;
    let article = service
        .create_article(NewArticle::titled("A"), "u1")
        .await
        .unwrap();
    let reference = EntityRef::parse(&article.id);

    assert!(service.toggle_like(&reference, "u1").await.unwrap());
    assert!(!service.toggle_like(&reference, "u1").await.unwrap());
    assert_eq!(service.get_article_likes(&reference).await.unwrap(), 0);
}

#[tokio::test]
async fn test_counts_are_per_subject() {
    let (service, _) = service_with_users().await;
    let first = service
        .create_article(NewArticle::titled("first"), "u1")
        .await
        .unwrap();
    let second = service
        .create_article(NewArticle::titled("second"), "u1")
        .await
        .unwrap();

    for actor in ["u1", "u2", "u3"] {
        service
            .toggle_like(&EntityRef::parse(&first.id), actor)
            .await
            .unwrap();
    }
    service
        .toggle_like(&EntityRef::parse(&second.id), "u2")
        .await
        .unwrap();

    assert_eq!(
        service
            .get_article_likes(&EntityRef::ByLegacyId(1))
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        service
            .get_article_likes(&EntityRef::ByLegacyId(2))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_new_records_use_storage_key() {
    let (service, store) = service_with_users().await;
    let article = service
        .create_article(NewArticle::titled("A"), "u1")
        .await
        .unwrap();

    service
        .toggle_bookmark(&EntityRef::ByLegacyId(1), "u2")
        .await
        .unwrap();

    let records = store.scan("bookmarks").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data["articleId"], json!(article.id));
    assert_eq!(records[0].data["userId"], json!("u2"));
    assert!(records[0].data["createdAt"]["seconds"].is_i64());
}

#[tokio::test]
async fn test_toggle_off_clears_duplicate_pair_records() {
    let (service, store) = service_with_users().await;
    let article = service
        .create_article(NewArticle::titled("A"), "u1")
        .await
        .unwrap();
    // Two racing togglers can both insert
    for article_id in [json!(article.id), json!("1")] {
        store
            .insert("likes", json!({"articleId": article_id, "userId": "u2"}))
            .await
            .unwrap();
    }
    let reference = EntityRef::parse(&article.id);
    assert_eq!(service.get_article_likes(&reference).await.unwrap(), 2);

    assert!(!service.toggle_like(&reference, "u2").await.unwrap());
    assert_eq!(service.get_article_likes(&reference).await.unwrap(), 0);
    assert!(!service.has_liked(&reference, "u2").await.unwrap());
}

#[tokio::test]
async fn test_blank_actor_rejected() {
    let (service, _) = service_with_users().await;
    let article = service
        .create_article(NewArticle::titled("A"), "u1")
        .await
        .unwrap();

    assert!(matches!(
        service.toggle_like(&EntityRef::parse(&article.id), " ").await,
        Err(pressroom::DataError::Validation(_))
    ));
}
