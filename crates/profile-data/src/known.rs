//! Persisted set of candidates that already got a Like or a Pass.
//!
//! The backing file is a JSON array of ids in decision order. It is read
//! once when the store is opened and rewritten in full after every
//! [`KnownCandidateStore::record`], so a crash never loses a decision that
//! was already made.

use crate::error::{DataError, Result};
use crate::types::CandidateId;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What [`KnownCandidateStore::open`] found on disk
#[derive(Debug)]
pub enum LoadStatus {
    /// The file existed and was decoded
    Loaded(usize),
    /// There was no file; an empty one was written
    Created,
    /// The file could not be decoded; it was replaced by an empty set
    Reset(DataError),
}

/// Write-through store of known candidate ids.
#[derive(Debug)]
pub struct KnownCandidateStore {
    path: PathBuf,
    /// Insertion order, which is what gets written back
    ordered: Vec<CandidateId>,
    lookup: HashSet<CandidateId>,
}

impl KnownCandidateStore {
    /// Open the store at `path`.
    ///
    /// A missing file is created empty. A corrupted file is reported through
    /// [`LoadStatus::Reset`], overwritten with an empty set, and never fails
    /// the call. Only real I/O failures (permissions, full disk) are errors.
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, LoadStatus)> {
        let path = path.into();
        let mut store = Self {
            path,
            ordered: Vec::new(),
            lookup: HashSet::new(),
        };

        let raw = match fs::read(&store.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.persist()?;
                return Ok((store, LoadStatus::Created));
            }
            Err(e) => return Err(DataError::io(&store.path, e)),
        };

        match serde_json::from_slice::<Vec<CandidateId>>(&raw) {
            Ok(ids) => {
                for id in ids {
                    store.insert(id);
                }
                let count = store.len();
                debug!("Loaded {} known candidates from {}", count, store.path.display());
                Ok((store, LoadStatus::Loaded(count)))
            }
            Err(e) => {
                warn!(
                    "Failed to decode known candidates in {}: {}; starting over with an empty set",
                    store.path.display(),
                    e
                );
                store.persist()?;
                let reason = DataError::Corrupted {
                    path: store.path.clone(),
                    reason: e.to_string(),
                };
                Ok((store, LoadStatus::Reset(reason)))
            }
        }
    }

    pub fn contains(&self, id: &CandidateId) -> bool {
        self.lookup.contains(id)
    }

    /// Insert `id` if absent, then persist the whole set.
    ///
    /// Persisting happens even when the id was already known, so the file
    /// always mirrors memory after this returns `Ok`.
    pub fn record(&mut self, id: &CandidateId) -> Result<()> {
        if self.insert(id.clone()) {
            debug!("Recorded {} as known", id);
        }
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids in the order they were first recorded
    pub fn ids(&self) -> &[CandidateId] {
        &self.ordered
    }

    fn insert(&mut self, id: CandidateId) -> bool {
        if self.lookup.insert(id.clone()) {
            self.ordered.push(id);
            true
        } else {
            false
        }
    }

    fn persist(&self) -> Result<()> {
        let encoded = serde_json::to_string(&self.ordered)?;
        fs::write(&self.path, encoded).map_err(|e| DataError::io(&self.path, e))
    }
}
