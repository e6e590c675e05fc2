//! pressroom - data access and feed assembly for a content platform
//!
//! Articles, comments, likes, bookmarks, follows and reports over a
//! schemaless document store, with dual identity resolution (storage key or
//! legacy numeric id) and per-viewer feed enrichment.

pub mod cli;
pub mod codec;
pub mod config;
pub mod engagement;
pub mod errors;
pub mod feed;
pub mod gate;
pub mod http_server;
pub mod identity;
pub mod model;
pub mod observability;
pub mod sequence;
pub mod service;
pub mod store;

pub use errors::{DataError, DataResult};
pub use service::{ContentService, Limits};
