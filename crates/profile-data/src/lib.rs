//! # Profile Data Crate
//!
//! Domain types and the small local files the agent keeps between runs.
//!
//! ## Main Components
//!
//! - **types**: Candidate, Stack, Batch, SelfProfile, Preferences
//! - **known**: the write-through Known-Candidate Store
//! - **forbidden_list**: the operator's block-list file
//! - **settings**: `settings.ini` parsing and generation
//! - **cookie**: the saved session cookie list
//! - **error**: Error types for local state
//!
//! ## Example Usage
//!
//! ```ignore
//! use profile_data::{KnownCandidateStore, Settings};
//! use std::path::Path;
//!
//! let (settings, _) = Settings::load(Path::new("settings.ini"))?;
//! let (mut known, _status) = KnownCandidateStore::open(&settings.known_profiles_file)?;
//!
//! if !known.contains(&id) {
//!     known.record(&id)?;
//! }
//! ```

// Public modules
pub mod cookie;
pub mod error;
pub mod forbidden_list;
pub mod known;
pub mod settings;
pub mod types;

// Re-export commonly used types for convenience
pub use cookie::{read_cookie, write_cookie};
pub use error::{DataError, Result};
pub use forbidden_list::read_forbidden_list;
pub use known::{KnownCandidateStore, LoadStatus};
pub use settings::{DefaultChoice, Settings, SettingsSource};
pub use types::{
    Batch, Candidate, CandidateId, CandidateKind, Preferences, SelfProfile, Stack, UnitSystem,
};
