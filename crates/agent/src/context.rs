//! Everything the scheduler needs, built once at startup and handed over.

use okc_client::ApiClient;
use pipeline::filters::{ForbiddenContentFilter, ForbiddenStringSet, RelevanceFilter};
use pipeline::FilterPipeline;
use profile_data::{KnownCandidateStore, Settings};
use std::sync::Arc;

use crate::decision::DecisionPolicy;
use crate::scheduler::SchedulePolicy;

pub struct AgentContext<O, S> {
    pub client: Arc<dyn ApiClient>,
    pub operator: O,
    pub sleeper: S,
    pub known: KnownCandidateStore,
    pub screen: FilterPipeline,
    pub decision: DecisionPolicy,
    pub schedule: SchedulePolicy,
}

impl<O, S> AgentContext<O, S> {
    /// Build a context from loaded settings and the forbidden list.
    pub fn from_settings(
        settings: &Settings,
        client: Arc<dyn ApiClient>,
        operator: O,
        sleeper: S,
        known: KnownCandidateStore,
        forbidden: &[String],
    ) -> Self {
        Self {
            client,
            operator,
            sleeper,
            known,
            screen: screening_pipeline(settings.bio_min_length, forbidden),
            decision: DecisionPolicy::from_settings(settings),
            schedule: SchedulePolicy::from_settings(settings),
        }
    }
}

/// The bio screen: relevance first, then forbidden content.
pub fn screening_pipeline(min_length: usize, forbidden: &[String]) -> FilterPipeline {
    FilterPipeline::new()
        .add_filter(RelevanceFilter::new(min_length))
        .add_filter(ForbiddenContentFilter::new(ForbiddenStringSet::new(forbidden)))
}
