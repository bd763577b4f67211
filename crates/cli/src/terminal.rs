//! Terminal side of the agent: stdin for answers, stdout for everything shown
//! to the operator.

use agent::{Announcement, AnnouncementKind, Operator, OperatorError, Pause, Sleeper};
use async_trait::async_trait;
use colored::Colorize;
use profile_data::DefaultChoice;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

pub struct TerminalOperator {
    input: Lines<BufReader<Stdin>>,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt` without a newline and read one line back.
    pub async fn ask(&mut self, prompt: &str) -> Result<String, OperatorError> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        match self.input.next_line().await? {
            Some(line) => Ok(line),
            None => Err(OperatorError::Closed),
        }
    }

    /// Ask until the answer is not blank.
    pub async fn ask_non_empty(&mut self, prompt: &str, retry: &str) -> Result<String, OperatorError> {
        let mut answer = self.ask(prompt).await?;
        while answer.trim().is_empty() {
            answer = self.ask(retry).await?;
        }
        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl Operator for TerminalOperator {
    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }

    fn progress(&mut self, line: &str) {
        println!("{}", line.dimmed());
    }

    fn announce(&mut self, announcement: &Announcement<'_>) {
        let text = announcement.headline();
        let headline = if announcement.candidate.already_interested_in_user {
            text.as_str().magenta().bold()
        } else {
            match announcement.kind {
                AnnouncementKind::Liked => text.as_str().green().bold(),
                AnnouncementKind::Suggested => text.as_str().yellow().bold(),
            }
        };
        println!();
        println!("{}", headline);
        println!("{}", announcement.candidate.bio());
        println!();
    }

    async fn prompt_choice(
        &mut self,
        prompt: &str,
        _default: DefaultChoice,
    ) -> Result<String, OperatorError> {
        self.ask(&prompt.bold().to_string()).await
    }

    fn display_photos(&mut self, urls: &[String]) {
        if urls.is_empty() {
            println!("No photos.");
        }
        for url in urls {
            println!(" - {}", url);
        }
    }
}

/// Waits out pauses one second at a time, rewriting a countdown line.
pub struct CountdownSleeper;

#[async_trait]
impl Sleeper for CountdownSleeper {
    async fn sleep(&mut self, pause: Pause) {
        let label = match pause {
            Pause::Jitter(_) => "Sleeping for",
            Pause::Backoff(_) => "Retrying in",
        };

        let mut remaining = pause.duration().as_secs();
        if remaining == 0 {
            return;
        }
        while remaining > 0 {
            let unit = if remaining == 1 { "second" } else { "seconds" };
            print!("\r{} {} {}... ", label, remaining, unit);
            if let Err(e) = std::io::stdout().flush() {
                debug!("Failed to flush countdown: {}", e);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            remaining -= 1;
        }
        println!();
    }
}
