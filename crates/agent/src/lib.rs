//! The agent: decides on every recommended candidate and keeps fetching more.
//!
//! This crate wires the other crates together:
//! - [`DecisionEngine`] turns a candidate into a like, a pass or nothing
//! - [`BatchScheduler`] runs the fetch, process, sleep loop
//! - [`Operator`] and [`Sleeper`] are the seams to the terminal and the clock
//!
//! ## Example Usage
//! ```ignore
//! let context = AgentContext::from_settings(&settings, client, operator, sleeper, known, &forbidden);
//! BatchScheduler::new(context).run().await?;
//! ```

pub mod context;
pub mod decision;
pub mod error;
pub mod operator;
pub mod scheduler;

#[cfg(test)]
mod testing;

pub use context::{AgentContext, screening_pipeline};
pub use decision::{Action, DecisionEngine, DecisionPolicy, Outcome};
pub use error::{AgentError, Result};
pub use operator::{
    Announcement, AnnouncementKind, Operator, OperatorChoice, OperatorError, like_prompt,
};
pub use scheduler::{BatchReport, BatchScheduler, Pause, SchedulePolicy, Sleeper, progress_line};
