//! # Entity Codec
//!
//! Converts stored records into in-memory entities with concrete instants.
//! Decode-only: write paths build their own raw documents.

pub mod entity;
pub mod errors;
pub mod timestamp;

pub use entity::{
    decode_article, decode_comment, decode_report, decode_user, integer_field, reference_field,
    LEGACY_ID_FIELD,
};
pub use errors::{CodecError, CodecResult};
pub use timestamp::{decode_timestamp, decode_timestamp_field};
