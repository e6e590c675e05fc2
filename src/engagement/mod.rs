//! # Engagement Store
//!
//! Likes, bookmarks and follows are standalone records keyed by a
//! (subject, actor) pair. A record existing *is* the engaged state; there is
//! no flag and no update path. Toggling deletes if present, else inserts.
//!
//! Toggle is not safe against concurrent togglers of the same pair: both can
//! observe "absent" and insert, or both observe "present" and delete.

pub mod kind;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

pub use kind::{EngagementKind, Subject};

use crate::codec::reference_field;
use crate::errors::DataResult;
use crate::observability::{log_event, Event};
use crate::store::{server_timestamp, DocumentStore, StoreResult, StoredDocument};

/// Engagement record storage
#[derive(Clone)]
pub struct EngagementStore {
    store: Arc<dyn DocumentStore>,
}

impl EngagementStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every record of `kind` naming `subject`, under any of its keys
    async fn subject_records(
        &self,
        kind: EngagementKind,
        subject: &Subject,
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut by_key = BTreeMap::new();
        for key in subject.all_keys() {
            let needle = Value::String(key.to_string());
            for doc in self
                .store
                .find_eq(kind.collection(), kind.subject_field(), &needle)
                .await?
            {
                by_key.insert(doc.key.clone(), doc);
            }
        }
        Ok(by_key.into_values().collect())
    }

    async fn pair_records(
        &self,
        kind: EngagementKind,
        subject: &Subject,
        actor: &str,
    ) -> StoreResult<Vec<StoredDocument>> {
        let records = self.subject_records(kind, subject).await?;
        Ok(records
            .into_iter()
            .filter(|doc| reference_field(&doc.data, kind.actor_field()).as_deref() == Some(actor))
            .collect())
    }

    /// Flip the pair's state. Returns `true` if now engaged.
    pub async fn toggle(
        &self,
        kind: EngagementKind,
        subject: &Subject,
        actor: &str,
    ) -> DataResult<bool> {
        let existing = self.pair_records(kind, subject, actor).await?;

        let engaged = if existing.is_empty() {
            let mut record = Map::new();
            record.insert(kind.subject_field().to_string(), json!(subject.key()));
            record.insert(kind.actor_field().to_string(), json!(actor));
            record.insert("createdAt".to_string(), server_timestamp());
            self.store
                .insert(kind.collection(), Value::Object(record))
                .await?;
            true
        } else {
            for doc in &existing {
                self.store.delete(kind.collection(), &doc.key).await?;
            }
            false
        };

        let state = if engaged { "on" } else { "off" };
        log_event(
            Event::EngagementToggled,
            &[
                ("actor", actor),
                ("kind", kind.as_str()),
                ("state", state),
                ("subject", subject.key()),
            ],
        );
        Ok(engaged)
    }

    /// Number of records naming `subject`
    pub async fn count(&self, kind: EngagementKind, subject: &Subject) -> DataResult<u64> {
        Ok(self.subject_records(kind, subject).await?.len() as u64)
    }

    /// Whether `actor` is engaged with `subject`
    pub async fn exists(
        &self,
        kind: EngagementKind,
        subject: &Subject,
        actor: &str,
    ) -> DataResult<bool> {
        Ok(!self.pair_records(kind, subject, actor).await?.is_empty())
    }

    /// Number of records made by `actor`
    pub async fn count_by_actor(&self, kind: EngagementKind, actor: &str) -> DataResult<u64> {
        let needle = Value::String(actor.to_string());
        let records = self
            .store
            .find_eq(kind.collection(), kind.actor_field(), &needle)
            .await?;
        Ok(records.len() as u64)
    }

    /// Delete every record naming `subject`. Returns how many were removed.
    pub async fn remove_subject(&self, kind: EngagementKind, subject: &Subject) -> DataResult<usize> {
        let records = self.subject_records(kind, subject).await?;
        let mut removed = 0;
        for doc in &records {
            if self.store.delete(kind.collection(), &doc.key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
