//! # Document Store Module
//!
//! The backing store boundary and its local implementations.
//!
//! Every entity kind lives in one flat collection. The only store-side
//! queries are key lookups, full scans and single-field equality; all other
//! filtering happens in memory after a full read, so no composite index has
//! to be provisioned. Full scans are the scalability ceiling of this design.

pub mod document;
pub mod errors;
pub mod file;
pub mod memory;
pub mod timestamp;

pub use document::{DocumentStore, StoreFuture, StoredDocument};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::{MemoryStore, Snapshot};
pub use timestamp::{server_timestamp, SERVER_TIMESTAMP_MARKER};
