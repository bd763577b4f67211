//! # Decision Engine
//!
//! Turns one candidate into one decision:
//!
//! 1. Screen the bio (relevance + forbidden content)
//! 2. Candidates that fail screening, and did not already like the operator,
//!    are passed automatically (or only reported when auto-pass is off)
//! 3. Everyone else is announced; with auto-like on they are liked, either
//!    straight away or after the operator confirms
//! 4. A candidate that is already known is never liked twice: the like turns
//!    into a pass
//!
//! Every Like or Pass records the id in the Known-Candidate Store *before*
//! the vote is sent, so a crash between the two can never lead to a second
//! vote on a later run. A failed vote is logged and does not stop the batch.

use okc_client::ApiClient;
use pipeline::{FilterPipeline, Screening};
use profile_data::{Candidate, DefaultChoice, KnownCandidateStore, Settings};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::operator::{Announcement, AnnouncementKind, Operator, OperatorChoice, like_prompt};

/// What the engine is allowed to do on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionPolicy {
    pub auto_like: bool,
    pub ask_before_like: bool,
    pub default_choice: DefaultChoice,
    pub auto_pass: bool,
}

impl DecisionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            auto_like: settings.auto_like,
            ask_before_like: settings.ask_before_like,
            default_choice: settings.ask_before_like_default_choice,
            auto_pass: settings.auto_pass,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Pass,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Like => "like",
            Action::Pass => "pass",
        })
    }
}

/// How a candidate ended up. `delivered` is whether the remote vote succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Sponsored slot, not evaluated
    Advertisement,
    /// Failed screening and was passed automatically
    AutoPassed { screening: Screening, delivered: bool },
    /// Failed screening; auto-pass is off so nothing was sent
    Filtered { screening: Screening },
    /// Eligible, but auto-like is off so nothing was sent
    Suggested,
    /// Liked, either automatically or after the operator said yes
    Liked { confirmed: bool, delivered: bool },
    /// The operator said no
    Passed { delivered: bool },
    /// Would have been liked, but was already known, so passed instead
    ForcedPass { delivered: bool },
}

impl Outcome {
    /// The vote that was attempted, if any
    pub fn action(&self) -> Option<Action> {
        match self {
            Outcome::Liked { .. } => Some(Action::Like),
            Outcome::AutoPassed { .. } | Outcome::Passed { .. } | Outcome::ForcedPass { .. } => {
                Some(Action::Pass)
            }
            Outcome::Advertisement | Outcome::Filtered { .. } | Outcome::Suggested => None,
        }
    }
}

pub struct DecisionEngine {
    policy: DecisionPolicy,
    screen: FilterPipeline,
    known: KnownCandidateStore,
}

impl DecisionEngine {
    pub fn new(policy: DecisionPolicy, screen: FilterPipeline, known: KnownCandidateStore) -> Self {
        Self {
            policy,
            screen,
            known,
        }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn known(&self) -> &KnownCandidateStore {
        &self.known
    }

    /// Decide on one candidate and carry the decision out.
    pub async fn decide(
        &mut self,
        candidate: &Candidate,
        client: &dyn ApiClient,
        operator: &mut dyn Operator,
    ) -> Result<Outcome> {
        if candidate.is_advertisement() {
            return Ok(Outcome::Advertisement);
        }

        let screening = self.screen.screen(candidate.bio());

        if !candidate.already_interested_in_user && !screening.is_clear() {
            debug!("{} did not pass screening: {}", candidate.id, screening.summary());
            if !self.policy.auto_pass {
                return Ok(Outcome::Filtered { screening });
            }
            let delivered = self.act(candidate, Action::Pass, client).await?;
            return Ok(Outcome::AutoPassed {
                screening,
                delivered,
            });
        }

        let kind = if self.policy.auto_like && !self.policy.ask_before_like {
            AnnouncementKind::Liked
        } else {
            AnnouncementKind::Suggested
        };
        operator.announce(&Announcement { candidate, kind });

        if !self.policy.auto_like {
            return Ok(Outcome::Suggested);
        }

        if self.known.contains(&candidate.id) {
            warn!(
                "{} was already decided on but is being recommended again; passing instead of liking",
                candidate.id
            );
            operator.notice("Already liked this person, forcing pass...");
            let delivered = self.act(candidate, Action::Pass, client).await?;
            return Ok(Outcome::ForcedPass { delivered });
        }

        if !self.policy.ask_before_like {
            let delivered = self.act(candidate, Action::Like, client).await?;
            return Ok(Outcome::Liked {
                confirmed: false,
                delivered,
            });
        }

        self.await_operator(candidate, client, operator).await
    }

    /// Ask until the operator answers yes or no.
    async fn await_operator(
        &mut self,
        candidate: &Candidate,
        client: &dyn ApiClient,
        operator: &mut dyn Operator,
    ) -> Result<Outcome> {
        let default = self.policy.default_choice;
        let prompt = like_prompt(candidate, default);

        loop {
            let answer = operator.prompt_choice(&prompt, default).await?;
            match OperatorChoice::parse(&answer, default) {
                OperatorChoice::Like => {
                    let delivered = self.act(candidate, Action::Like, client).await?;
                    return Ok(Outcome::Liked {
                        confirmed: true,
                        delivered,
                    });
                }
                OperatorChoice::Pass => {
                    let delivered = self.act(candidate, Action::Pass, client).await?;
                    return Ok(Outcome::Passed { delivered });
                }
                OperatorChoice::ViewPhotos => operator.display_photos(&candidate.photo_urls),
                OperatorChoice::Invalid => operator.notice("Invalid choice, try again."),
            }
        }
    }

    /// Record the candidate as known, then send the vote.
    ///
    /// Returns whether the vote was delivered. Only a failure to persist the
    /// known set is an error.
    async fn act(&mut self, candidate: &Candidate, action: Action, client: &dyn ApiClient) -> Result<bool> {
        self.known.record(&candidate.id)?;

        match client.vote(&candidate.id, action == Action::Like).await {
            Ok(_) => {
                info!("Sent {} for {} ({})", action, candidate.display_name, candidate.id);
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to {} {}: {}", action, candidate.id, e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, ScriptedOperator};
    use pipeline::filters::{ForbiddenContentFilter, ForbiddenStringSet, RelevanceFilter};
    use pipeline::RejectReason;
    use tempfile::TempDir;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    const MIN_LENGTH: usize = 20;

    fn policy() -> DecisionPolicy {
        DecisionPolicy {
            auto_like: true,
            ask_before_like: false,
            default_choice: DefaultChoice::Pass,
            auto_pass: true,
        }
    }

    fn build_engine(dir: &TempDir, policy: DecisionPolicy, forbidden: &[&str]) -> DecisionEngine {
        let (known, _) = KnownCandidateStore::open(dir.path().join("known.json")).unwrap();
        let screen = FilterPipeline::new()
            .add_filter(RelevanceFilter::new(MIN_LENGTH))
            .add_filter(ForbiddenContentFilter::new(ForbiddenStringSet::new(
                forbidden.iter().copied(),
            )));
        DecisionEngine::new(policy, screen, known)
    }

    fn long_bio() -> String {
        "x".repeat(40)
    }

    // ============================================================================
    // Automatic decisions
    // ============================================================================

    #[tokio::test]
    async fn test_eligible_candidate_is_liked() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: false, delivered: true });
        assert_eq!(client.votes(), vec![("1".to_string(), true)]);
        assert!(engine.known().contains(&ana.id));
        assert_eq!(operator.announcements, vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_short_bio_is_passed() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let bea = Candidate::new("2", "Bea").with_bio("hi");
        let outcome = engine.decide(&bea, &client, &mut operator).await.unwrap();

        match outcome {
            Outcome::AutoPassed { screening, delivered } => {
                assert!(delivered);
                assert_eq!(screening.rejections[0].reason, RejectReason::TooShort);
            }
            other => panic!("expected an automatic pass, got {:?}", other),
        }
        assert_eq!(client.votes(), vec![("2".to_string(), false)]);
        assert!(engine.known().contains(&bea.id));
        assert!(operator.announcements.is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_bio_is_passed() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &["smoker"]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let bio = format!("{} Social SMOKER", long_bio());
        let cami = Candidate::new("3", "Cami").with_bio(bio);
        let outcome = engine.decide(&cami, &client, &mut operator).await.unwrap();

        assert_eq!(outcome.action(), Some(Action::Pass));
        assert_eq!(client.votes(), vec![("3".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_filtered_without_auto_pass_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { auto_pass: false, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let bea = Candidate::new("2", "Bea");
        let outcome = engine.decide(&bea, &client, &mut operator).await.unwrap();

        assert!(matches!(outcome, Outcome::Filtered { .. }));
        assert!(client.votes().is_empty());
        assert!(!engine.known().contains(&bea.id));
    }

    #[tokio::test]
    async fn test_interest_overrides_screening() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &["smoker"]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let dana = Candidate::new("4", "Dana").with_bio("smoker").interested(true);
        let outcome = engine.decide(&dana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: false, delivered: true });
        assert_eq!(client.votes(), vec![("4".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_auto_like_off_only_suggests() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { auto_like: false, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Suggested);
        assert!(client.votes().is_empty());
        assert!(!engine.known().contains(&ana.id));
        assert_eq!(operator.announcements.len(), 1);
    }

    #[tokio::test]
    async fn test_advertisement_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let outcome = engine
            .decide(&Candidate::advertisement(), &client, &mut operator)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Advertisement);
        assert!(client.votes().is_empty());
        assert!(engine.known().is_empty());
    }

    // ============================================================================
    // Known-candidate override
    // ============================================================================

    #[tokio::test]
    async fn test_known_candidate_is_never_liked_twice() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        engine.decide(&ana, &client, &mut operator).await.unwrap();
        let second = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(second, Outcome::ForcedPass { delivered: true });
        assert_eq!(
            client.votes(),
            vec![("1".to_string(), true), ("1".to_string(), false)]
        );
        assert!(operator
            .notices
            .iter()
            .any(|n| n.contains("forcing pass")));
    }

    #[tokio::test]
    async fn test_known_candidate_is_not_prompted() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { ask_before_like: true, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::answering(&["y"]);

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        engine.decide(&ana, &client, &mut operator).await.unwrap();
        let second = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(second, Outcome::ForcedPass { delivered: true });
        assert_eq!(operator.prompts.len(), 1);
    }

    // ============================================================================
    // Operator confirmation
    // ============================================================================

    #[tokio::test]
    async fn test_operator_yes_likes() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { ask_before_like: true, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::answering(&["Y"]);

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: true, delivered: true });
        assert_eq!(client.votes(), vec![("1".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_operator_no_passes() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { ask_before_like: true, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::answering(&["n"]);

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Passed { delivered: true });
        assert_eq!(client.votes(), vec![("1".to_string(), false)]);
        assert!(engine.known().contains(&ana.id));
    }

    #[tokio::test]
    async fn test_empty_answer_uses_default() {
        let dir = TempDir::new().unwrap();
        let policy = DecisionPolicy {
            ask_before_like: true,
            default_choice: DefaultChoice::Like,
            ..policy()
        };
        let mut engine = build_engine(&dir, policy, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::answering(&[""]);

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: true, delivered: true });
    }

    #[tokio::test]
    async fn test_photos_and_invalid_answers_reprompt() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { ask_before_like: true, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::answering(&["p", "maybe", "p", "y"]);

        let ana = Candidate::new("1", "Ana")
            .with_bio(long_bio())
            .with_photos(vec!["https://img/1.jpg".to_string()]);
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: true, delivered: true });
        assert_eq!(operator.prompts.len(), 4);
        assert_eq!(operator.photo_views, 2);
        assert!(operator.notices.iter().any(|n| n.contains("Invalid choice")));
        assert_eq!(client.votes().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, DecisionPolicy { ask_before_like: true, ..policy() }, &[]);
        let client = MockClient::default();
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let result = engine.decide(&ana, &client, &mut operator).await;

        assert!(matches!(result, Err(crate::AgentError::Operator(_))));
        assert!(client.votes().is_empty());
    }

    // ============================================================================
    // Vote failures
    // ============================================================================

    #[tokio::test]
    async fn test_failed_vote_still_records_known() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::failing_votes();
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        let outcome = engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(outcome, Outcome::Liked { confirmed: false, delivered: false });
        assert!(engine.known().contains(&ana.id));
    }

    #[tokio::test]
    async fn test_known_is_persisted_before_vote() {
        let dir = TempDir::new().unwrap();
        let mut engine = build_engine(&dir, policy(), &[]);
        let client = MockClient::default().watching_file(dir.path().join("known.json"));
        let mut operator = ScriptedOperator::default();

        let ana = Candidate::new("1", "Ana").with_bio(long_bio());
        engine.decide(&ana, &client, &mut operator).await.unwrap();

        assert_eq!(client.file_at_vote(), vec![r#"["1"]"#.to_string()]);
    }
}
