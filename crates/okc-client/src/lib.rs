//! Client for the remote profile-matching service.
//!
//! This crate provides the four remote operations the agent needs behind the
//! [`ApiClient`] trait, plus one implementation of it over HTTP:
//! - GraphQL queries for the self profile, preferences, and recommendation stacks
//! - The REST vote endpoint for likes and passes
//! - Loading named query bodies from disk
//!
//! The decision engine only ever sees [`ApiClient`], so tests (and any other
//! transport) can stand in for [`OkCupidClient`].

use async_trait::async_trait;
use profile_data::{Batch, CandidateId, Preferences, SelfProfile};

pub mod client;
pub mod error;
pub mod queries;
pub mod wire;

pub use client::{ClientConfig, OkCupidClient};
pub use error::{ClientError, Result};
pub use queries::{constant_name, QueryCatalog};

/// Acknowledgement of a vote, as returned by the service
#[derive(Debug, Clone, Default)]
pub struct VoteAck {
    pub response: serde_json::Value,
}

/// The remote operations the agent depends on.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch the next page of recommendations.
    async fn fetch_batch(&self) -> Result<Batch>;

    /// Like (`true`) or pass (`false`) on a candidate.
    async fn vote(&self, id: &CandidateId, like: bool) -> Result<VoteAck>;

    async fn fetch_self_profile(&self) -> Result<SelfProfile>;

    async fn fetch_preferences(&self) -> Result<Preferences>;
}
