//! Filter implementations for bio screening.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod forbidden;
pub mod relevance;

// Re-export for convenience
pub use forbidden::{ForbiddenContentFilter, ForbiddenStringSet};
pub use relevance::RelevanceFilter;
