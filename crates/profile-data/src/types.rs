//! Core domain types for recommendation consumption.
//!
//! A fetch returns a [`Batch`], which is an ordered list of named [`Stack`]s,
//! each an ordered list of [`Candidate`]s. Nothing here knows about the wire
//! format; the client crate converts its responses into these types.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque identifier of a recommended profile, stable across fetches.
///
/// Rust concept: a newtype keeps candidate ids from being mixed up with any
/// other string floating around (cookies, names, query bodies).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// Candidates
// =============================================================================

/// Whether a feed entry is a real profile or a sponsored slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    RealCandidate,
    Advertisement,
}

/// One recommended profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub display_name: String,
    pub age: Option<u32>,
    /// Public location name; absent means "don't show one"
    pub location_label: Option<String>,
    /// First essay of the profile; absent is the same as empty
    pub bio_text: Option<String>,
    pub photo_urls: Vec<String>,
    /// The candidate already liked the operator
    pub already_interested_in_user: bool,
    pub kind: CandidateKind,
}

impl Candidate {
    /// Create a real candidate with only an id and a name.
    ///
    /// Mostly useful in tests; the client fills every field.
    pub fn new(id: impl Into<CandidateId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            age: None,
            location_label: None,
            bio_text: None,
            photo_urls: Vec::new(),
            already_interested_in_user: false,
            kind: CandidateKind::RealCandidate,
        }
    }

    /// A sponsored slot. Only the kind matters for these.
    pub fn advertisement() -> Self {
        Self {
            kind: CandidateKind::Advertisement,
            ..Self::new("", "")
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio_text = Some(bio.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_label = Some(location.into());
        self
    }

    pub fn with_photos(mut self, urls: Vec<String>) -> Self {
        self.photo_urls = urls;
        self
    }

    pub fn interested(mut self, interested: bool) -> Self {
        self.already_interested_in_user = interested;
        self
    }

    /// The bio, or an empty string when the profile has none
    pub fn bio(&self) -> &str {
        self.bio_text.as_deref().unwrap_or("")
    }

    pub fn is_advertisement(&self) -> bool {
        self.kind == CandidateKind::Advertisement
    }

    /// `Name (27y, Madrid)`, skipping whatever is missing
    pub fn headline(&self) -> String {
        let mut details = Vec::new();
        if let Some(age) = self.age {
            details.push(format!("{age}y"));
        }
        if let Some(location) = self.location_label.as_deref().filter(|l| !l.is_empty()) {
            details.push(location.to_string());
        }

        if details.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} ({})", self.display_name, details.join(", "))
        }
    }
}

// =============================================================================
// Batches
// =============================================================================

/// A named group of candidates inside a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stack {
    pub id: String,
    pub candidates: Vec<Candidate>,
}

impl Stack {
    pub fn new(id: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            id: id.into(),
            candidates,
        }
    }

    /// Human label for a stack id: `JUST_FOR_YOU` becomes `Just for you`.
    pub fn label(&self) -> String {
        let lowered = self.id.replace('_', " ").to_lowercase();
        let mut chars = lowered.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// One fetched page of recommendations.
///
/// A batch is consumed fully and then discarded; it is never retried
/// partially.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    pub stacks: Vec<Stack>,
}

impl Batch {
    pub fn new(stacks: Vec<Stack>) -> Self {
        Self { stacks }
    }

    /// Number of real candidates across all stacks (advertisements excluded).
    pub fn candidate_count(&self) -> usize {
        self.candidates().filter(|c| !c.is_advertisement()).count()
    }

    /// Every entry in fetch order, stacks first to last.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.stacks.iter().flat_map(|stack| stack.candidates.iter())
    }

    pub fn is_exhausted(&self) -> bool {
        self.candidate_count() == 0
    }
}

// =============================================================================
// Account
// =============================================================================

/// Distance unit the account displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// The remote service reports `METRIC`; everything else is miles.
    pub fn from_preference(value: &str) -> Self {
        if value.eq_ignore_ascii_case("METRIC") {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    pub fn distance_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }
}

/// The operator's own profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfProfile {
    pub display_name: String,
    pub units: UnitSystem,
}

/// The account's own search filters. Read once, display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub min_age: u32,
    pub max_age: u32,
    pub max_distance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_label() {
        assert_eq!(Stack::new("JUST_FOR_YOU", vec![]).label(), "Just for you");
        assert_eq!(Stack::new("NEW_USERS", vec![]).label(), "New users");
        assert_eq!(Stack::new("", vec![]).label(), "");
    }

    #[test]
    fn test_candidate_count_excludes_advertisements() {
        let batch = Batch::new(vec![
            Stack::new("A", vec![Candidate::new("1", "Ana"), Candidate::advertisement()]),
            Stack::new("B", vec![Candidate::new("2", "Bea")]),
        ]);

        assert_eq!(batch.candidate_count(), 2);
        assert_eq!(batch.candidates().count(), 3);
        assert!(!batch.is_exhausted());
    }

    #[test]
    fn test_batch_of_only_ads_is_exhausted() {
        let batch = Batch::new(vec![Stack::new("A", vec![Candidate::advertisement()])]);
        assert!(batch.is_exhausted());
        assert!(Batch::default().is_exhausted());
    }

    #[test]
    fn test_missing_bio_reads_as_empty() {
        let candidate = Candidate::new("1", "Ana");
        assert_eq!(candidate.bio(), "");
    }

    #[test]
    fn test_headline_skips_missing_parts() {
        let full = Candidate::new("1", "Ana").with_age(29).with_location("Lisbon");
        assert_eq!(full.headline(), "Ana (29y, Lisbon)");

        let bare = Candidate::new("2", "Bea");
        assert_eq!(bare.headline(), "Bea");
    }

    #[test]
    fn test_unit_system_from_preference() {
        assert_eq!(UnitSystem::from_preference("METRIC"), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_preference("IMPERIAL"), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Metric.distance_suffix(), "km");
    }
}
