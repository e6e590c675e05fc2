//! # Identity Resolver
//!
//! Two-step lookup, first hit wins:
//! 1. the reference text as a storage key
//! 2. if that misses or fails, and the reference is an integer, an equality
//!    scan on the legacy id field
//!
//! Either way the returned document carries its storage key, so decoding
//! yields the same `id` whichever path matched. Read-only; mutating callers
//! re-resolve instead of reusing an earlier result.

use std::sync::Arc;

use serde_json::Value;

use super::reference::EntityRef;
use crate::codec::LEGACY_ID_FIELD;
use crate::errors::DataResult;
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::store::{DocumentStore, StoreError, StoredDocument};

/// Locates the authoritative record for an [`EntityRef`]
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn DocumentStore>,
    metrics: Arc<MetricsRegistry>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn DocumentStore>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { store, metrics }
    }

    /// Resolve `reference` within `collection`.
    ///
    /// A failed key lookup with no legacy fallback available is returned as
    /// an error rather than "not found", so callers can tell the two apart.
    pub async fn resolve(
        &self,
        collection: &str,
        reference: &EntityRef,
    ) -> DataResult<Option<StoredDocument>> {
        if reference.is_empty() {
            return Ok(None);
        }
        self.metrics.increment_entity_lookups();

        let key = reference.key();
        let key_error = match self.store.get(collection, &key).await {
            Ok(Some(doc)) => return Ok(Some(doc)),
            Ok(None) => None,
            Err(e) => {
                let reason = e.to_string();
                log_event(
                    Event::KeyLookupFailed,
                    &[("collection", collection), ("key", key.as_str()), ("error", reason.as_str())],
                );
                Some(e)
            }
        };

        let Some(legacy_id) = reference.legacy_id() else {
            return match key_error {
                Some(e) => Err(e.into()),
                None => Ok(None),
            };
        };

        let found = self.find_by_legacy_id(collection, legacy_id).await?;
        if let Some(doc) = &found {
            self.metrics.increment_legacy_fallbacks();
            let id = legacy_id.to_string();
            log_event(
                Event::LegacyIdFallback,
                &[("collection", collection), ("key", doc.key.as_str()), ("legacy_id", id.as_str())],
            );
        }
        Ok(found)
    }

    /// Equality scan on the legacy id field.
    ///
    /// Legacy ids were written both as numbers and as numeric strings.
    /// Duplicates can exist after a counter race; the lowest key wins.
    pub async fn find_by_legacy_id(
        &self,
        collection: &str,
        legacy_id: i64,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let numeric = Value::from(legacy_id);
        let mut hits = self.store.find_eq(collection, LEGACY_ID_FIELD, &numeric).await?;
        if hits.is_empty() {
            let text = Value::String(legacy_id.to_string());
            hits = self.store.find_eq(collection, LEGACY_ID_FIELD, &text).await?;
        }

        if hits.len() > 1 {
            let id = legacy_id.to_string();
            let count = hits.len().to_string();
            log_event(
                Event::DuplicateLegacyId,
                &[("collection", collection), ("count", count.as_str()), ("legacy_id", id.as_str())],
            );
        }
        hits.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(hits.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn resolver_with(store: MemoryStore) -> (IdentityResolver, Arc<MetricsRegistry>) {
        let metrics = Arc::new(MetricsRegistry::new());
        (
            IdentityResolver::new(Arc::new(store), Arc::clone(&metrics)),
            metrics,
        )
    }

    #[tokio::test]
    async fn test_key_lookup_wins() {
        let store = MemoryStore::new();
        store.set("articles", "k1", json!({"legacyId": 1})).await.unwrap();
        let (resolver, metrics) = resolver_with(store);

        let doc = resolver
            .resolve("articles", &EntityRef::from("k1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.key, "k1");
        assert_eq!(metrics.snapshot().legacy_fallbacks, 0);
    }

    #[tokio::test]
    async fn test_numeric_key_preferred_over_legacy_scan() {
        let store = MemoryStore::new();
        store.set("articles", "5", json!({"title": "keyed"})).await.unwrap();
        store.set("articles", "other", json!({"legacyId": 5, "title": "legacy"})).await.unwrap();
        let (resolver, _) = resolver_with(store);

        let doc = resolver
            .resolve("articles", &EntityRef::ByLegacyId(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["title"], "keyed");
    }

    #[tokio::test]
    async fn test_legacy_fallback() {
        let store = MemoryStore::new();
        store.set("articles", "abc", json!({"legacyId": 7})).await.unwrap();
        let (resolver, metrics) = resolver_with(store);

        let doc = resolver
            .resolve("articles", &EntityRef::parse("7"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.key, "abc");
        assert_eq!(metrics.snapshot().legacy_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_legacy_id_stored_as_string() {
        let store = MemoryStore::new();
        store.set("articles", "abc", json!({"legacyId": "8"})).await.unwrap();
        let (resolver, _) = resolver_with(store);

        let doc = resolver.resolve("articles", &EntityRef::ByLegacyId(8)).await.unwrap();
        assert_eq!(doc.map(|d| d.key), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_legacy_ids_pick_lowest_key() {
        let store = MemoryStore::new();
        store.set("articles", "zz", json!({"legacyId": 3})).await.unwrap();
        store.set("articles", "aa", json!({"legacyId": 3})).await.unwrap();
        let (resolver, _) = resolver_with(store);

        let doc = resolver.resolve("articles", &EntityRef::ByLegacyId(3)).await.unwrap();
        assert_eq!(doc.map(|d| d.key), Some("aa".to_string()));
    }

    #[tokio::test]
    async fn test_not_found() {
        let (resolver, _) = resolver_with(MemoryStore::new());
        assert!(resolver
            .resolve("articles", &EntityRef::from("missing"))
            .await
            .unwrap()
            .is_none());
        assert!(resolver
            .resolve("articles", &EntityRef::ByLegacyId(99))
            .await
            .unwrap()
            .is_none());
        assert!(resolver
            .resolve("articles", &EntityRef::from(""))
            .await
            .unwrap()
            .is_none());
    }
}
