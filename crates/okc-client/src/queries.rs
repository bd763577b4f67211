//! Named GraphQL query bodies loaded from disk.
//!
//! Each file in the query directory holds one query; the file stem is the
//! operation name, so `SelfProfileQuery.gql` provides `SelfProfileQuery`.

use crate::error::{ClientError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const SELF_PROFILE_QUERY: &str = "SelfProfileQuery";
pub const GLOBAL_PREFERENCES_QUERY: &str = "GlobalPreferencesQuery";
pub const STACKS_MENU_QUERY: &str = "StacksMenuQuery";

/// Operations the client cannot work without
pub const REQUIRED_QUERIES: &[&str] = &[
    SELF_PROFILE_QUERY,
    GLOBAL_PREFERENCES_QUERY,
    STACKS_MENU_QUERY,
];

#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    queries: HashMap<String, String>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every regular file in `dir`. Subdirectories are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let io_err = |source| ClientError::Queries {
            path: dir.to_path_buf(),
            source,
        };

        let mut catalog = Self::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let operation = operation_name(name).to_string();
            let body = fs::read_to_string(&path).map_err(io_err)?;
            debug!("Loaded query {} ({})", operation, constant_name(name));
            catalog.insert(operation, body);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, operation: impl Into<String>, body: impl Into<String>) {
        self.queries.insert(operation.into(), body.into());
    }

    pub fn get(&self, operation: &str) -> Result<&str> {
        self.queries
            .get(operation)
            .map(String::as_str)
            .ok_or_else(|| ClientError::MissingQuery(operation.to_string()))
    }

    /// Fail if any of [`REQUIRED_QUERIES`] is missing.
    pub fn ensure_required(&self) -> Result<()> {
        for operation in REQUIRED_QUERIES {
            self.get(operation)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// File name up to the first dot
fn operation_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Upper snake case of the operation a file provides:
/// `SelfProfileQuery.gql` becomes `SELF_PROFILE_QUERY`.
pub fn constant_name(file_name: &str) -> String {
    let mut name = String::new();
    for (i, c) in operation_name(file_name).chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            name.push('_');
        }
        name.extend(c.to_uppercase());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_constant_name() {
        assert_eq!(constant_name("SelfProfileQuery.gql"), "SELF_PROFILE_QUERY");
        assert_eq!(constant_name("StacksMenuQuery"), "STACKS_MENU_QUERY");
        assert_eq!(constant_name("a.b.c"), "A");
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("SelfProfileQuery.gql"), "query SelfProfileQuery { me { id } }").unwrap();
        fs::write(dir.path().join("StacksMenuQuery.gql"), "query StacksMenuQuery { }").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let catalog = QueryCatalog::load_dir(dir.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(SELF_PROFILE_QUERY).unwrap().contains("me"));
        assert!(matches!(
            catalog.ensure_required(),
            Err(ClientError::MissingQuery(name)) if name == GLOBAL_PREFERENCES_QUERY
        ));
    }

    #[test]
    fn test_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = QueryCatalog::load_dir(&dir.path().join("nope"));
        assert!(matches!(result, Err(ClientError::Queries { .. })));
    }
}
