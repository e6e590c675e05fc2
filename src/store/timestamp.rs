//! # Server Timestamps
//!
//! Writers never stamp times themselves. They place a marker that the store
//! replaces with its own clock reading, stored as `{seconds, nanoseconds}`.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

/// Key identifying an unresolved server timestamp marker
pub const SERVER_TIMESTAMP_MARKER: &str = "$serverTimestamp";

/// Marker asking the store to stamp its own time at write
pub fn server_timestamp() -> Value {
    let mut marker = Map::new();
    marker.insert(SERVER_TIMESTAMP_MARKER.to_string(), Value::Bool(true));
    Value::Object(marker)
}

/// Whether a value is an unresolved marker
pub fn is_server_timestamp(value: &Value) -> bool {
    value
        .get(SERVER_TIMESTAMP_MARKER)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Stored representation of an instant
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    json!({
        "seconds": at.timestamp(),
        "nanoseconds": at.timestamp_subsec_nanos(),
    })
}

/// Replace every marker in `value` with `at`. Returns how many were replaced.
pub fn materialize(value: &mut Value, at: DateTime<Utc>) -> usize {
    if is_server_timestamp(value) {
        *value = timestamp_value(at);
        return 1;
    }
    match value {
        Value::Object(map) => materialize_map(map, at),
        Value::Array(items) => items.iter_mut().map(|v| materialize(v, at)).sum(),
        _ => 0,
    }
}

fn materialize_map(map: &mut Map<String, Value>, at: DateTime<Utc>) -> usize {
    map.values_mut().map(|v| materialize(v, at)).sum()
}

/// Issues strictly increasing instants even when the wall clock stalls
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next instant, at least one nanosecond after the previous one
    pub fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last {
            Some(last) if now <= last => last + chrono::Duration::nanoseconds(1),
            _ => now,
        };
        self.last = Some(next);
        next
    }
}
