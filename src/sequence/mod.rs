//! # Sequence Allocator
//!
//! Issues legacy numeric ids from one counter record per entity kind in the
//! `counters` collection.
//!
//! Allocation is a plain read followed by a write. Two concurrent callers
//! for the same kind can both read `n` and both return `n + 1`. Callers that
//! need strict uniqueness must serialize creation of a kind themselves.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::{DataError, DataResult};
use crate::model::collections;
use crate::store::DocumentStore;

/// Field of the counter record holding the last issued value
pub const COUNT_FIELD: &str = "count";

/// Entity kinds that carry legacy ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Articles,
    Comments,
}

impl SequenceKind {
    /// Key of the counter record for this kind
    pub fn counter_key(&self) -> &'static str {
        match self {
            SequenceKind::Articles => "articles",
            SequenceKind::Comments => "comments",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.counter_key())
    }
}

/// Counter-backed id allocator
#[derive(Clone)]
pub struct SequenceAllocator {
    store: Arc<dyn DocumentStore>,
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Next id for `kind`: 1 when no counter exists, else stored count + 1.
    pub async fn next_id(&self, kind: SequenceKind) -> DataResult<i64> {
        let current = self.current(kind).await?;
        let next = current + 1;
        let mut record = Map::new();
        record.insert(COUNT_FIELD.to_string(), Value::from(next));
        self.store
            .set(collections::COUNTERS, kind.counter_key(), Value::Object(record))
            .await?;
        Ok(next)
    }

    /// Last issued value, 0 if none
    pub async fn current(&self, kind: SequenceKind) -> DataResult<i64> {
        let record = self
            .store
            .get(collections::COUNTERS, kind.counter_key())
            .await?;
        let Some(record) = record else {
            return Ok(0);
        };
        match record.field(COUNT_FIELD) {
            None => Ok(0),
            Some(value) => value.as_i64().ok_or_else(|| {
                DataError::BackendUnavailable(format!(
                    "corrupt record: counter '{}' holds {}",
                    kind, value
                ))
            }),
        }
    }
}
