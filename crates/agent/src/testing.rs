//! In-memory stand-ins for the client, the operator and the clock.

use async_trait::async_trait;
use okc_client::{ApiClient, ClientError, Result as ClientResult, VoteAck};
use profile_data::{Batch, CandidateId, DefaultChoice, Preferences, SelfProfile, UnitSystem};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::operator::{Announcement, Operator, OperatorError};
use crate::scheduler::{Pause, Sleeper};

#[derive(Default)]
pub struct MockClient {
    batches: Mutex<VecDeque<ClientResult<Batch>>>,
    votes: Mutex<Vec<(String, bool)>>,
    fail_votes: bool,
    watched: Option<PathBuf>,
    file_at_vote: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn with_batches(batches: Vec<ClientResult<Batch>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    pub fn failing_votes() -> Self {
        Self {
            fail_votes: true,
            ..Self::default()
        }
    }

    /// Snapshot `path` every time a vote comes in.
    pub fn watching_file(mut self, path: PathBuf) -> Self {
        self.watched = Some(path);
        self
    }

    pub fn votes(&self) -> Vec<(String, bool)> {
        self.votes.lock().unwrap().clone()
    }

    pub fn file_at_vote(&self) -> Vec<String> {
        self.file_at_vote.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiClient for MockClient {
    async fn fetch_batch(&self) -> ClientResult<Batch> {
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::MissingField {
                operation: "StacksMenu".to_string(),
                path: "data.me.stacks".to_string(),
            }))
    }

    async fn vote(&self, id: &CandidateId, like: bool) -> ClientResult<VoteAck> {
        if let Some(path) = &self.watched {
            let contents = std::fs::read_to_string(path).unwrap_or_default();
            self.file_at_vote.lock().unwrap().push(contents);
        }
        self.votes.lock().unwrap().push((id.to_string(), like));

        if self.fail_votes {
            return Err(ClientError::Status {
                url: "https://api.test/1/likes/batch".to_string(),
                status: 500,
                body: String::new(),
            });
        }
        Ok(VoteAck::default())
    }

    async fn fetch_self_profile(&self) -> ClientResult<SelfProfile> {
        Ok(SelfProfile {
            display_name: "Tester".to_string(),
            units: UnitSystem::Metric,
        })
    }

    async fn fetch_preferences(&self) -> ClientResult<Preferences> {
        Ok(Preferences {
            min_age: 25,
            max_age: 35,
            max_distance: 50,
        })
    }
}

/// Answers prompts from a fixed script; runs out as a closed input.
#[derive(Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub notices: Vec<String>,
    pub progress: Vec<String>,
    pub announcements: Vec<String>,
    pub prompts: Vec<String>,
    pub photo_views: usize,
}

impl ScriptedOperator {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn progress(&mut self, line: &str) {
        self.progress.push(line.to_string());
    }

    fn announce(&mut self, announcement: &Announcement<'_>) {
        self.announcements.push(announcement.candidate.id.to_string());
    }

    async fn prompt_choice(
        &mut self,
        prompt: &str,
        _default: DefaultChoice,
    ) -> std::result::Result<String, OperatorError> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(OperatorError::Closed)
    }

    fn display_photos(&mut self, _urls: &[String]) {
        self.photo_views += 1;
    }
}

/// Records pauses instead of waiting them out.
#[derive(Default)]
pub struct RecordingSleeper {
    pub pauses: Vec<Pause>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&mut self, pause: Pause) {
        self.pauses.push(pause);
    }
}
