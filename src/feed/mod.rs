//! # Feed Module
//!
//! View selection and enriched article list assembly.

pub mod assembler;
pub mod view;

pub use assembler::{order_newest_first, FeedAssembler};
pub use view::View;
