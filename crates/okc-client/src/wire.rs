//! Response shapes of the remote API and their conversion to domain types.
//!
//! Only the fields the agent reads are modelled; serde ignores the rest.

use profile_data::{Batch, Candidate, CandidateKind, Preferences, SelfProfile, Stack, UnitSystem};
use serde::Deserialize;
use tracing::warn;

/// `__typename` of a real recommendation; anything else is an ad slot
const STACK_MATCH: &str = "StackMatch";

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Every query used here nests its payload under `data.me`
#[derive(Debug, Deserialize)]
pub struct MeEnvelope<T> {
    pub me: Option<T>,
}

// =============================================================================
// SelfProfileQuery
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfProfileWire {
    pub displayname: String,
    #[serde(default)]
    pub unit_preference: Option<String>,
}

impl From<SelfProfileWire> for SelfProfile {
    fn from(wire: SelfProfileWire) -> Self {
        SelfProfile {
            display_name: wire.displayname,
            units: UnitSystem::from_preference(wire.unit_preference.as_deref().unwrap_or("")),
        }
    }
}

// =============================================================================
// GlobalPreferencesQuery
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPreferencesEnvelope {
    pub global_preferences: Option<GlobalPreferencesWire>,
}

#[derive(Debug, Deserialize)]
pub struct GlobalPreferencesWire {
    pub age: RangeWire,
    pub distance: RangeWire,
}

#[derive(Debug, Deserialize)]
pub struct RangeWire {
    #[serde(default)]
    pub values: Vec<f64>,
}

impl GlobalPreferencesWire {
    /// `None` when a range has fewer values than expected.
    pub fn into_preferences(self) -> Option<Preferences> {
        let min_age = *self.age.values.first()?;
        let max_age = *self.age.values.get(1)?;
        let max_distance = *self.distance.values.first()?;
        Some(Preferences {
            min_age: min_age as u32,
            max_age: max_age as u32,
            max_distance: max_distance as u32,
        })
    }
}

// =============================================================================
// StacksMenuQuery
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StacksEnvelope {
    pub stacks: Option<Vec<StackWire>>,
}

#[derive(Debug, Deserialize)]
pub struct StackWire {
    pub id: String,
    #[serde(default)]
    pub data: Vec<StackEntryWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackEntryWire {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub target_likes_sender: bool,
    #[serde(rename = "match", default)]
    pub matched: Option<MatchWire>,
}

#[derive(Debug, Deserialize)]
pub struct MatchWire {
    pub user: UserWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWire {
    pub id: String,
    #[serde(default)]
    pub displayname: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub user_location: Option<LocationWire>,
    #[serde(default)]
    pub photos: Option<Vec<PhotoWire>>,
    #[serde(default)]
    pub essays_with_unique_ids: Option<Vec<EssayWire>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationWire {
    #[serde(default)]
    pub public_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoWire {
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayWire {
    #[serde(default)]
    pub processed_content: Option<String>,
}

impl StackEntryWire {
    /// Convert one stack entry. Real entries without a user are dropped with
    /// a warning since there is nothing to decide on.
    fn into_candidate(self, stack_id: &str) -> Option<Candidate> {
        if self.typename != STACK_MATCH {
            return Some(Candidate::advertisement());
        }

        let Some(matched) = self.matched else {
            warn!("Dropping {} entry without a user in stack {}", STACK_MATCH, stack_id);
            return None;
        };
        let user = matched.user;

        Some(Candidate {
            id: user.id.into(),
            display_name: user.displayname,
            age: user.age,
            location_label: user.user_location.and_then(|l| l.public_name),
            bio_text: user
                .essays_with_unique_ids
                .and_then(|essays| essays.into_iter().next())
                .and_then(|essay| essay.processed_content),
            photo_urls: user
                .photos
                .unwrap_or_default()
                .into_iter()
                .filter_map(|p| p.original)
                .collect(),
            already_interested_in_user: self.target_likes_sender,
            kind: CandidateKind::RealCandidate,
        })
    }
}

impl StackWire {
    pub fn into_stack(self) -> Stack {
        let id = self.id;
        let candidates = self
            .data
            .into_iter()
            .filter_map(|entry| entry.into_candidate(&id))
            .collect();
        Stack { id, candidates }
    }
}

pub fn into_batch(stacks: Vec<StackWire>) -> Batch {
    Batch::new(stacks.into_iter().map(StackWire::into_stack).collect())
}
