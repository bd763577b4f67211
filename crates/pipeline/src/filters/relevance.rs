//! Filter for bios that say too little to judge.
//!
//! A bio that is only a social-media handle, or only a few words padded with
//! emoji, gives nothing to decide on, so it is not eligible for an automatic
//! like.

use crate::text::{char_len, remove_emoji, strip_handles};
use crate::traits::{Filter, RejectReason, Verdict};

/// Rejects bios shorter than a minimum number of characters.
///
/// ## Algorithm
/// Rules are applied in order and the first failing one wins:
/// 1. Lower-case, strip the first `ig:` handle and the first `@` handle, trim
/// 2. Nothing left -> [`RejectReason::NoTextAfterHandle`]
/// 3. Fewer than `min_length` chars -> [`RejectReason::TooShort`]
/// 4. Fewer than `min_length` chars once emoji are removed ->
///    [`RejectReason::TooShortAfterEmoji`]
pub struct RelevanceFilter {
    min_length: usize,
}

impl RelevanceFilter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// `Ok(())` when the text is relevant, otherwise the reason it is not.
    pub fn is_relevant(&self, text: &str) -> Result<(), RejectReason> {
        let stripped = strip_handles(text);

        if stripped.is_empty() {
            return Err(RejectReason::NoTextAfterHandle);
        }

        if char_len(&stripped) < self.min_length {
            return Err(RejectReason::TooShort);
        }

        if char_len(&remove_emoji(&stripped)) < self.min_length {
            return Err(RejectReason::TooShortAfterEmoji);
        }

        Ok(())
    }
}

impl Filter for RelevanceFilter {
    fn name(&self) -> &str {
        "RelevanceFilter"
    }

    fn check(&self, text: &str) -> Verdict {
        match self.is_relevant(text) {
            Ok(()) => Verdict::Keep,
            Err(reason) => Verdict::Reject(reason),
        }
    }
}
