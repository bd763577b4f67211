//! Storage for the session cookie list the operator copies from a browser.

use crate::error::{DataError, Result};
use std::fs;
use std::path::Path;

/// Read the saved cookie list. Missing or blank files give `None`.
pub fn read_cookie(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let cookie = content.trim();
            Ok((!cookie.is_empty()).then(|| cookie.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DataError::io(path, e)),
    }
}

/// Save a cookie list, replacing whatever was there.
pub fn write_cookie(path: &Path, cookie: &str) -> Result<()> {
    fs::write(path, cookie.trim()).map_err(|e| DataError::io(path, e))
}
