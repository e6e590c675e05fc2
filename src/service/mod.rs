//! # Content Service
//!
//! The operation surface handed to the HTTP layer. Every public operation
//! awaits the readiness gate first, then goes through the identity resolver
//! (single-entity operations) or the feed assembler (list operations).
//!
//! Ownership checks are the caller's job: operations here take a resolved
//! actor identity and trust it.

mod articles;
mod comments;
mod reports;
mod social;
mod users;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::codec::CodecResult;
use crate::config::{AuthMode, ServiceConfig};
use crate::engagement::EngagementStore;
use crate::errors::{DataError, DataResult};
use crate::feed::FeedAssembler;
use crate::gate::{AnonymousAuth, AuthProvider, GateState, NoAuth, ReadinessGate, ServiceAuth};
use crate::identity::{IdentityResolver, UserDirectory};
use crate::observability::{log_event, Event, MetricsRegistry, MetricsSnapshot};
use crate::sequence::SequenceAllocator;
use crate::store::{DocumentStore, FileStore, MemoryStore, StoredDocument};

/// Input length limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_comment_length: usize,
    pub max_report_reason_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_comment_length: 5000,
            max_report_reason_length: 1000,
        }
    }
}

impl From<&ServiceConfig> for Limits {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            max_comment_length: config.max_comment_length,
            max_report_reason_length: config.max_report_reason_length,
        }
    }
}

/// Data-access and feed-assembly core
pub struct ContentService {
    store: Arc<dyn DocumentStore>,
    gate: ReadinessGate,
    resolver: IdentityResolver,
    users: UserDirectory,
    sequence: SequenceAllocator,
    engagement: EngagementStore,
    feed: FeedAssembler,
    metrics: Arc<MetricsRegistry>,
    limits: Limits,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self::with_limits(store, auth, Limits::default())
    }

    pub fn with_limits(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        limits: Limits,
    ) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let resolver = IdentityResolver::new(Arc::clone(&store), Arc::clone(&metrics));
        let users = UserDirectory::new(Arc::clone(&store), resolver.clone());
        let engagement = EngagementStore::new(Arc::clone(&store));
        let feed = FeedAssembler::new(
            Arc::clone(&store),
            users.clone(),
            engagement.clone(),
            Arc::clone(&metrics),
        );

        Self {
            gate: ReadinessGate::new(auth, Arc::clone(&metrics)),
            sequence: SequenceAllocator::new(Arc::clone(&store)),
            store,
            resolver,
            users,
            engagement,
            feed,
            metrics,
            limits,
        }
    }

    /// Build the store and auth provider a config describes
    pub fn from_config(config: &ServiceConfig) -> DataResult<Self> {
        config
            .validate()
            .map_err(|e| DataError::validation(e.to_string()))?;

        let store: Arc<dyn DocumentStore> = match &config.data_file {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let auth: Arc<dyn AuthProvider> = match config.auth_mode {
            AuthMode::Anonymous => Arc::new(AnonymousAuth::new()),
            AuthMode::Service => Arc::new(ServiceAuth::new(
                config.service_identity.clone().unwrap_or_default(),
            )),
            AuthMode::None => Arc::new(NoAuth),
        };

        let backing = config
            .data_file
            .as_ref()
            .map_or_else(|| "memory".to_string(), |p| p.display().to_string());
        log_event(Event::ConfigLoaded, &[("store", backing.as_str())]);

        Ok(Self::with_limits(store, auth, Limits::from(config)))
    }

    /// Await the readiness gate
    pub async fn ready(&self) -> &GateState {
        self.gate.ready().await
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Point-in-time counter values
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Read back a record just written and decode it
    async fn reread<T>(
        &self,
        collection: &str,
        key: &str,
        decode: fn(&StoredDocument) -> CodecResult<T>,
    ) -> DataResult<T> {
        let doc = self.store.get(collection, key).await?.ok_or_else(|| {
            DataError::BackendUnavailable(format!("{}/{} missing after write", collection, key))
        })?;
        Ok(decode(&doc)?)
    }
}

/// Serialize an input value into a record field
fn field_value<T: Serialize>(value: &T) -> DataResult<Value> {
    serde_json::to_value(value).map_err(|e| DataError::validation(e.to_string()))
}

/// Reject blank or over-long text. Length counts characters, not bytes.
fn require_text(field: &str, text: &str, max: Option<usize>) -> DataResult<()> {
    if text.trim().is_empty() {
        return Err(DataError::validation(format!("{} must not be empty", field)));
    }
    if let Some(max) = max {
        if text.chars().count() > max {
            return Err(DataError::validation(format!(
                "{} exceeds {} characters",
                field, max
            )));
        }
    }
    Ok(())
}
