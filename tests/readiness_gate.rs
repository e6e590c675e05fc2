//! Readiness Gate Tests
//!
//! The latch signs in at most once, tolerates sign-in failure, and is
//! awaited by every public operation.

mod common;

use std::sync::Arc;

use common::{seed_user, CountingAuth, FlakyStore};
use futures_util::future::join_all;
use pressroom::feed::View;
use pressroom::gate::{GateState, ReadinessGate};
use pressroom::identity::EntityRef;
use pressroom::model::NewArticle;
use pressroom::observability::MetricsRegistry;
use pressroom::store::DocumentStore;
use pressroom::ContentService;

#[tokio::test]
async fn test_concurrent_awaiters_share_one_sign_in() {
    let auth = Arc::new(CountingAuth::succeeding());
    let gate = Arc::new(ReadinessGate::new(
        Arc::clone(&auth) as Arc<dyn pressroom::gate::AuthProvider>,
        Arc::new(MetricsRegistry::new()),
    ));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.ready().await.clone() })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.await.unwrap(),
            GateState::Authenticated("anon-1".to_string())
        );
    }
    assert_eq!(auth.attempts(), 1);

    gate.ready().await;
    assert_eq!(auth.attempts(), 1);
}

#[tokio::test]
async fn test_auth_outage_does_not_block_reads() {
    let store = Arc::new(FlakyStore::new());
    seed_user(&store, "u1", "ada").await;
    let auth = Arc::new(CountingAuth::failing());
    let service = ContentService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::clone(&auth) as Arc<dyn pressroom::gate::AuthProvider>,
    );

    let user = service.get_user(&EntityRef::parse("u1")).await.unwrap();
    assert_eq!(user.username, "ada");
    assert!(service.list_articles(View::Public, None).await.is_empty());

    assert_eq!(service.ready().await, &GateState::Unauthenticated);
    assert_eq!(auth.attempts(), 1);
    assert_eq!(service.metrics().gate_auth_failures, 1);
}

#[tokio::test]
async fn test_parallel_operations_trigger_single_sign_in() {
    let store = Arc::new(FlakyStore::new());
    seed_user(&store, "u1", "ada").await;
    let auth = Arc::new(CountingAuth::succeeding());
    let service = ContentService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::clone(&auth) as Arc<dyn pressroom::gate::AuthProvider>,
    );

    let creations = (0..8).map(|i| {
        service.create_article(NewArticle::titled(format!("post {}", i)), "u1")
    });
    let results = join_all(creations).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(auth.attempts(), 1);
    assert_eq!(service.list_articles(View::Public, None).await.len(), 8);
}
