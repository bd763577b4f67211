//! The FilterPipeline runs every filter over a bio.
//!
//! Unlike a short-circuiting chain, every filter gets to look at the text so
//! the caller can report all the reasons a bio was turned down.

use crate::traits::{Filter, RejectReason, Verdict};
use tracing;

/// One filter's objection to a bio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub filter: String,
    pub reason: RejectReason,
}

/// Result of running a bio through the whole pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screening {
    pub rejections: Vec<Rejection>,
}

impl Screening {
    /// No filter objected
    pub fn is_clear(&self) -> bool {
        self.rejections.is_empty()
    }

    pub fn has_forbidden_content(&self) -> bool {
        self.rejections
            .iter()
            .any(|r| r.reason == RejectReason::Forbidden)
    }

    /// Reasons joined for a log line, e.g. `too short; contains forbidden content`
    pub fn summary(&self) -> String {
        self.rejections
            .iter()
            .map(|r| r.reason.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Runs a set of filters over a piece of text.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(RelevanceFilter::new(200))
///     .add_filter(ForbiddenContentFilter::new(forbidden));
///
/// let screening = pipeline.screen(candidate.bio());
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter, in the order they were added, over `text`.
    pub fn screen(&self, text: &str) -> Screening {
        let mut screening = Screening::default();
        for filter in &self.filters {
            match filter.check(text) {
                Verdict::Keep => {
                    tracing::trace!("Filter {} kept the text", filter.name());
                }
                Verdict::Reject(reason) => {
                    tracing::debug!("Filter {} rejected the text: {}", filter.name(), reason);
                    screening.rejections.push(Rejection {
                        filter: filter.name().to_string(),
                        reason,
                    });
                }
            }
        }
        screening
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
