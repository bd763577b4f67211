//! Errors that stop the agent.
//!
//! Anything recoverable (a failed vote, an invalid answer at the prompt, a
//! corrupted known-candidate file) is handled where it happens and never
//! shows up here.

use okc_client::ClientError;
use profile_data::DataError;
use thiserror::Error;

use crate::operator::OperatorError;

#[derive(Error, Debug)]
pub enum AgentError {
    /// Fetching the next batch failed; there is nothing sensible to retry
    #[error("Failed to fetch recommendations: {0}")]
    Fetch(#[source] ClientError),

    /// A decision could not be persisted, so deduplication can't be guaranteed
    #[error("Failed to persist known candidates: {0}")]
    Store(#[from] DataError),

    /// The operator's input went away in the middle of a prompt
    #[error("Operator input failed: {0}")]
    Operator(#[from] OperatorError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
