//! Filter for bios containing block-listed strings.

use crate::text::{fold_diacritics, normalize};
use crate::traits::{Filter, RejectReason, Verdict};

/// Block-list entries in match form.
///
/// Every entry is kept lower-cased as written and, when different, also in
/// its diacritic-folded form, so `café` in the list catches `CAFE` in a bio.
/// Duplicates are dropped; order follows the source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenStringSet {
    entries: Vec<String>,
}

impl ForbiddenStringSet {
    pub fn new<I, S>(raw_entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for raw in raw_entries {
            let entry = raw.as_ref().trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }
            let folded = fold_diacritics(&entry);
            set.push(entry);
            set.push(folded);
        }
        set
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: String) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }
}

/// Rejects bios that contain any entry of a [`ForbiddenStringSet`].
///
/// ## Algorithm
/// 1. Normalize the bio (lower-case, fold diacritics)
/// 2. Case-sensitive substring search for every entry
/// 3. First hit rejects; no hit (or an empty set) keeps
pub struct ForbiddenContentFilter {
    forbidden: ForbiddenStringSet,
}

impl ForbiddenContentFilter {
    pub fn new(forbidden: ForbiddenStringSet) -> Self {
        Self { forbidden }
    }

    pub fn forbidden(&self) -> &ForbiddenStringSet {
        &self.forbidden
    }

    /// The block-list entry found in `text`, if any.
    pub fn find_match(&self, text: &str) -> Option<&str> {
        if self.forbidden.is_empty() {
            return None;
        }
        let normalized = normalize(text);
        self.forbidden
            .entries()
            .iter()
            .find(|entry| normalized.contains(entry.as_str()))
            .map(String::as_str)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.find_match(text).is_some()
    }
}

impl Filter for ForbiddenContentFilter {
    fn name(&self) -> &str {
        "ForbiddenContentFilter"
    }

    fn check(&self, text: &str) -> Verdict {
        match self.find_match(text) {
            Some(entry) => {
                tracing::debug!("Bio matched forbidden entry '{}'", entry);
                Verdict::Reject(RejectReason::Forbidden)
            }
            None => Verdict::Keep,
        }
    }
}
