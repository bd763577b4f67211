//! # Batch Scheduler
//!
//! Drives the agent forever:
//!
//! ```text
//! FetchBatch -> ProcessBatch -> Sleep -> (FetchBatch | Backoff -> FetchBatch)
//! ```
//!
//! A failed fetch ends the loop; nothing about a half-fetched batch is worth
//! retrying. Every batch is processed in full, stacks and candidates in fetch
//! order, one decision at a time.

use async_trait::async_trait;
use okc_client::ApiClient;
use pipeline::text::{char_len, preview};
use profile_data::{Batch, Candidate, CandidateId, Settings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::context::AgentContext;
use crate::decision::{Action, DecisionEngine, Outcome};
use crate::error::{AgentError, Result};
use crate::operator::Operator;

/// A wait between fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Random wait after every batch, drawn from `[0, max]` seconds
    Jitter(Duration),
    /// Fixed wait after a batch with no real candidates
    Backoff(Duration),
}

impl Pause {
    pub fn duration(&self) -> Duration {
        match self {
            Pause::Jitter(d) | Pause::Backoff(d) => *d,
        }
    }
}

/// Where the scheduler waits. The binary counts down on the terminal; tests
/// only record what was asked for.
#[async_trait]
pub trait Sleeper: Send {
    async fn sleep(&mut self, pause: Pause);
}

/// Timing and display knobs for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub max_sleep: Duration,
    pub exhaustion_backoff: Duration,
    pub progress_max_length: usize,
}

impl SchedulePolicy {
    pub fn new(max_sleep: Duration, exhaustion_backoff: Duration, progress_max_length: usize) -> Self {
        let exhaustion_backoff = if exhaustion_backoff <= max_sleep {
            let clamped = max_sleep.saturating_add(Duration::from_secs(1));
            warn!(
                "Exhaustion backoff ({:?}) is not longer than the max sleep ({:?}); using {:?}",
                exhaustion_backoff, max_sleep, clamped
            );
            clamped
        } else {
            exhaustion_backoff
        };

        Self {
            max_sleep,
            exhaustion_backoff,
            progress_max_length,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Duration::from_secs(settings.max_sleep_time),
            Duration::from_secs(settings.no_recommendations_retry_interval.saturating_mul(60)),
            settings.progress_max_length,
        )
    }
}

/// What happened to one batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Real candidates in the batch, advertisements excluded
    pub total: usize,
    pub outcomes: Vec<(CandidateId, Outcome)>,
}

impl BatchReport {
    pub fn is_exhausted(&self) -> bool {
        self.total == 0
    }

    pub fn likes(&self) -> usize {
        self.count(Action::Like)
    }

    pub fn passes(&self) -> usize {
        self.count(Action::Pass)
    }

    fn count(&self, action: Action) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.action() == Some(action))
            .count()
    }
}

pub struct BatchScheduler<O, S> {
    client: Arc<dyn ApiClient>,
    operator: O,
    sleeper: S,
    engine: DecisionEngine,
    policy: SchedulePolicy,
    rng: StdRng,
}

impl<O: Operator, S: Sleeper> BatchScheduler<O, S> {
    pub fn new(context: AgentContext<O, S>) -> Self {
        Self::with_rng(context, StdRng::from_os_rng())
    }

    /// Same as [`BatchScheduler::new`] with a fixed seed for the jitter.
    pub fn seeded(context: AgentContext<O, S>, seed: u64) -> Self {
        Self::with_rng(context, StdRng::seed_from_u64(seed))
    }

    fn with_rng(context: AgentContext<O, S>, rng: StdRng) -> Self {
        let AgentContext {
            client,
            operator,
            sleeper,
            known,
            screen,
            decision,
            schedule,
        } = context;

        Self {
            client,
            operator,
            sleeper,
            engine: DecisionEngine::new(decision, screen, known),
            policy: schedule,
            rng,
        }
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Run cycles until one fails.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.cycle().await?;
        }
    }

    /// One pass: fetch, process everything, then wait.
    pub async fn cycle(&mut self) -> Result<BatchReport> {
        let batch = self.client.fetch_batch().await.map_err(AgentError::Fetch)?;

        let report = self.process_batch(&batch).await?;
        info!(
            "Batch done: {} candidates, {} liked, {} passed",
            report.total,
            report.likes(),
            report.passes()
        );

        self.pause_after(&report).await;
        Ok(report)
    }

    /// Run every candidate of `batch` through the engine, in fetch order.
    pub async fn process_batch(&mut self, batch: &Batch) -> Result<BatchReport> {
        let mut report = BatchReport {
            total: batch.candidate_count(),
            outcomes: Vec::new(),
        };
        let mut index = 0;

        for stack in &batch.stacks {
            self.operator
                .notice(&format!("=> Processing stack \"{}\"...", stack.label()));

            for candidate in &stack.candidates {
                if candidate.is_advertisement() {
                    debug!("Skipping advertisement in stack {}", stack.id);
                    self.operator.notice("Skipping AD profile...");
                    continue;
                }

                index += 1;
                let line = progress_line(index, report.total, candidate, self.policy.progress_max_length);
                self.operator.progress(&line);

                let outcome = self
                    .engine
                    .decide(candidate, self.client.as_ref(), &mut self.operator)
                    .await?;
                debug!("{} -> {:?}", candidate.id, outcome);
                report.outcomes.push((candidate.id.clone(), outcome));
            }
        }

        Ok(report)
    }

    async fn pause_after(&mut self, report: &BatchReport) {
        let max = self.policy.max_sleep.as_secs();
        let jitter = Duration::from_secs(self.rng.random_range(0..=max));
        self.sleeper.sleep(Pause::Jitter(jitter)).await;

        if report.is_exhausted() {
            warn!("Batch had no candidates, backing off for {:?}", self.policy.exhaustion_backoff);
            self.operator
                .notice("Ran out of recommendations, try increasing the distance filter.");
            self.sleeper
                .sleep(Pause::Backoff(self.policy.exhaustion_backoff))
                .await;
        }
    }
}

/// `[ 3/12 ] Ana (29y, Lisbon): first words of the bio...`, cut to `max_length` chars.
pub fn progress_line(index: usize, total: usize, candidate: &Candidate, max_length: usize) -> String {
    let prefix = format!("[ {}/{} ] {}: ", index, total, candidate.headline());
    let room = max_length.saturating_sub(char_len(&prefix) + 1);
    format!("{}{}", prefix, preview(candidate.bio(), room))
}
