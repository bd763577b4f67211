//! The human side of the agent.
//!
//! The engine never prints or reads anything itself; it goes through an
//! [`Operator`]. The binary implements it on top of the terminal, tests with
//! a script of answers.

use async_trait::async_trait;
use profile_data::{Candidate, DefaultChoice};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    /// Input reached end-of-file while an answer was expected
    #[error("input closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answer at the like prompt, after applying the default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorChoice {
    Like,
    Pass,
    ViewPhotos,
    Invalid,
}

impl OperatorChoice {
    /// Interpret one line typed by the operator. Empty means `default`.
    pub fn parse(input: &str, default: DefaultChoice) -> Self {
        let answer = input.trim().to_lowercase();
        let answer = if answer.is_empty() {
            default.as_char().to_string()
        } else {
            answer
        };

        match answer.as_str() {
            "y" => OperatorChoice::Like,
            "n" => OperatorChoice::Pass,
            "p" => OperatorChoice::ViewPhotos,
            _ => OperatorChoice::Invalid,
        }
    }
}

/// How a like-eligible candidate is being presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    /// Will be liked without asking
    Liked,
    /// Shown for information or for confirmation
    Suggested,
}

/// A candidate that made it through screening (or already likes the operator)
#[derive(Debug, Clone, Copy)]
pub struct Announcement<'a> {
    pub candidate: &'a Candidate,
    pub kind: AnnouncementKind,
}

impl Announcement<'_> {
    /// `===> THEY LIKE YOU BACK! Liked person: Ana (29y, Lisbon) with ID 1, their bio says:`
    pub fn headline(&self) -> String {
        let interest = if self.candidate.already_interested_in_user {
            "THEY LIKE YOU BACK! "
        } else {
            ""
        };
        let verb = match self.kind {
            AnnouncementKind::Liked => "Liked",
            AnnouncementKind::Suggested => "Suggested",
        };
        format!(
            "===> {interest}{verb} person: {} with ID {}, their bio says:",
            self.candidate.headline(),
            self.candidate.id
        )
    }
}

#[async_trait]
pub trait Operator: Send {
    /// A free-form status line (stack headers, notices).
    fn notice(&mut self, message: &str);

    /// The one-line progress entry for the candidate being processed.
    fn progress(&mut self, line: &str);

    /// Present a like-eligible candidate in full.
    fn announce(&mut self, announcement: &Announcement<'_>);

    /// Show `prompt` and return the line the operator typed, unparsed.
    async fn prompt_choice(
        &mut self,
        prompt: &str,
        default: DefaultChoice,
    ) -> Result<String, OperatorError>;

    fn display_photos(&mut self, urls: &[String]);
}

/// `Do you like Ana? (Yy|Nn|Pp = view photos) [Nn]: `
pub fn like_prompt(candidate: &Candidate, default: DefaultChoice) -> String {
    let c = default.as_char();
    format!(
        "Do you like {}? (Yy|Nn|Pp = view photos) [{}{}]: ",
        candidate.display_name,
        c.to_ascii_uppercase(),
        c
    )
}
