// Result writer: dumps the raw search and details payloads to disk.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Everything saved after a successful lookup, written as-is.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    pub search: Value,
    pub chosen: Value,
}

/// Serialize `value` with two-space indentation and overwrite `path`.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "output written");
    Ok(())
}
