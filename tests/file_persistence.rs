//! File Store Persistence Tests
//!
//! Data written through the service survives reopening the snapshot file.

use std::sync::Arc;

use pressroom::config::{AuthMode, ServiceConfig};
use pressroom::feed::View;
use pressroom::gate::ServiceAuth;
use pressroom::identity::EntityRef;
use pressroom::model::NewArticle;
use pressroom::store::{DocumentStore, FileStore};
use pressroom::ContentService;
use serde_json::json;
use tempfile::TempDir;

fn open(path: &std::path::Path) -> ContentService {
    let store = FileStore::open(path).unwrap();
    ContentService::new(Arc::new(store), Arc::new(ServiceAuth::new("svc")))
}

#[tokio::test]
async fn test_reopen_preserves_articles_and_counter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pressroom-data.json");

    let first_id = {
        let service = open(&path);
        let article = service
            .create_article(NewArticle::titled("Persisted"), "u1")
            .await
            .unwrap();
        service
            .toggle_like(&EntityRef::parse(&article.id), "u2")
            .await
            .unwrap();
        article.id
    };

    let service = open(&path);
    let article = service
        .get_entity(&EntityRef::ByLegacyId(1))
        .await
        .unwrap();
    assert_eq!(article.id, first_id);
    assert_eq!(article.title, "Persisted");
    assert!(article.created_at.is_some());

    let second = service
        .create_article(NewArticle::titled("Next"), "u1")
        .await
        .unwrap();
    assert_eq!(second.legacy_id, Some(2));

    let public = service.list_articles(View::Public, Some("u2")).await;
    assert_eq!(public.len(), 2);
    let persisted = public
        .iter()
        .find(|row| row.article.id == first_id)
        .unwrap();
    assert_eq!(persisted.like_count, 1);
    assert!(persisted.is_liked);
}

#[tokio::test]
async fn test_service_from_config_uses_data_file() {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig {
        data_file: Some(dir.path().join("data.json")),
        auth_mode: AuthMode::Anonymous,
        ..Default::default()
    };

    {
        let service = ContentService::from_config(&config).unwrap();
        service
            .create_article(NewArticle::titled("From config"), "u1")
            .await
            .unwrap();
    }

    let service = ContentService::from_config(&config).unwrap();
    let articles = service.list_articles(View::Public, None).await;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].article.title, "From config");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_writes_keep_snapshot_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let store = Arc::new(FileStore::open(&path).unwrap());

    let mut handles = Vec::new();
    for i in 0..200 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.insert("articles", json!({"title": format!("a{}", i)})).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let in_memory = store.scan("articles").await.unwrap();
    assert_eq!(in_memory.len(), 200);

    let reopened = FileStore::open(&path).unwrap();
    let on_disk = reopened.scan("articles").await.unwrap();
    assert_eq!(on_disk.len(), 200);
}
