//! # Identity Module
//!
//! Reconciles storage keys with legacy numeric ids.

pub mod directory;
pub mod reference;
pub mod resolver;

pub use directory::UserDirectory;
pub use reference::EntityRef;
pub use resolver::IdentityResolver;
