//! Operator-editable block-list file, one entry per line.

use crate::error::{DataError, Result};
use std::fs;
use std::path::Path;

/// Read the block-list at `path`.
///
/// Entries are trimmed and blank lines are dropped. A missing file is created
/// empty so the operator can find it next to the other state files.
pub fn read_forbidden_list(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(path, "").map_err(|e| DataError::io(path, e))?;
            return Ok(Vec::new());
        }
        Err(e) => return Err(DataError::io(path, e)),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
