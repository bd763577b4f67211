//! Core traits for screening a candidate's bio.
//!
//! A filter looks at one piece of free text and either keeps it or says why
//! it should not be liked automatically. Filters are stateless after
//! construction, so they can be shared freely.

use std::fmt;

/// Why a filter turned a bio down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left once the social-media handle is removed
    NoTextAfterHandle,
    /// Shorter than the configured minimum
    TooShort,
    /// Long enough only thanks to emoji
    TooShortAfterEmoji,
    /// Contains a block-listed string
    Forbidden,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectReason::NoTextAfterHandle => "no text after removing handle",
            RejectReason::TooShort => "too short",
            RejectReason::TooShortAfterEmoji => "too short after removing emoji",
            RejectReason::Forbidden => "contains forbidden content",
        };
        f.write_str(reason)
    }
}

/// Outcome of a single filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject(RejectReason),
}

/// Core trait for screening text.
///
/// All filters must implement this trait to be used in the FilterPipeline.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Look at `text` and decide whether it survives this filter.
    fn check(&self, text: &str) -> Verdict;
}
