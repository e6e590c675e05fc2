//! # Timestamp Decoding
//!
//! Stored instants show up in several shapes depending on who wrote them.
//! Anything unrecognised decodes to `None`; it never fails.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::store::timestamp::is_server_timestamp;

/// Decode a stored instant.
///
/// Accepted shapes:
/// - `{"seconds": i64, "nanoseconds": u32}` (store-materialized)
/// - `{"_seconds": i64, "_nanoseconds": u32}` (exported records)
/// - RFC 3339 string
/// - integer milliseconds since the epoch
pub fn decode_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    if is_server_timestamp(raw) {
        // Marker never materialized by the store
        return None;
    }
    match raw {
        Value::Object(_) => decode_parts(raw, "seconds", "nanoseconds")
            .or_else(|| decode_parts(raw, "_seconds", "_nanoseconds")),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Decode an optional field of a document
pub fn decode_timestamp_field(doc: &Value, field: &str) -> Option<DateTime<Utc>> {
    doc.get(field).and_then(decode_timestamp)
}

fn decode_parts(raw: &Value, seconds: &str, nanos: &str) -> Option<DateTime<Utc>> {
    let secs = raw.get(seconds)?.as_i64()?;
    let nanos = match raw.get(nanos) {
        Some(v) => u32::try_from(v.as_u64()?).ok()?,
        None => 0,
    };
    DateTime::from_timestamp(secs, nanos)
}
