//! Screening of candidate bios.
//!
//! This crate provides:
//! - Text normalization (diacritic folding, emoji removal, handle stripping)
//! - Filter trait and implementations for bio screening
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! A bio goes through every filter in the pipeline and comes out as a
//! [`Screening`]. A clear screening means the bio is eligible for an
//! automatic like; otherwise the rejections say why not.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(RelevanceFilter::new(200))
//!     .add_filter(ForbiddenContentFilter::new(ForbiddenStringSet::new(entries)));
//!
//! if pipeline.screen(candidate.bio()).is_clear() {
//!     // eligible
//! }
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod text;
pub mod traits;

// Re-export main types
pub use filter_pipeline::{FilterPipeline, Rejection, Screening};
pub use filters::{ForbiddenContentFilter, ForbiddenStringSet, RelevanceFilter};
pub use traits::{Filter, RejectReason, Verdict};
