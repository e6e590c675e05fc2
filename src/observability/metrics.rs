//! Operational counters
//!
//! Counters only, monotonic, reset on process start. Relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters describing content core activity
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    entity_lookups: AtomicU64,
    legacy_fallbacks: AtomicU64,
    feeds_assembled: AtomicU64,
    feed_failures: AtomicU64,
    degraded_rows: AtomicU64,
    articles_created: AtomicU64,
    engagement_toggles: AtomicU64,
    gate_auth_failures: AtomicU64,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub entity_lookups: u64,
    pub legacy_fallbacks: u64,
    pub feeds_assembled: u64,
    pub feed_failures: u64,
    pub degraded_rows: u64,
    pub articles_created: u64,
    pub engagement_toggles: u64,
    pub gate_auth_failures: u64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_entity_lookups(&self) {
        self.entity_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_legacy_fallbacks(&self) {
        self.legacy_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_feeds_assembled(&self) {
        self.feeds_assembled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_feed_failures(&self) {
        self.feed_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_degraded_rows(&self) {
        self.degraded_rows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_articles_created(&self) {
        self.articles_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_engagement_toggles(&self) {
        self.engagement_toggles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gate_auth_failures(&self) {
        self.gate_auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entity_lookups: self.entity_lookups.load(Ordering::Relaxed),
            legacy_fallbacks: self.legacy_fallbacks.load(Ordering::Relaxed),
            feeds_assembled: self.feeds_assembled.load(Ordering::Relaxed),
            feed_failures: self.feed_failures.load(Ordering::Relaxed),
            degraded_rows: self.degraded_rows.load(Ordering::Relaxed),
            articles_created: self.articles_created.load(Ordering::Relaxed),
            engagement_toggles: self.engagement_toggles.load(Ordering::Relaxed),
            gate_auth_failures: self.gate_auth_failures.load(Ordering::Relaxed),
        }
    }
}
