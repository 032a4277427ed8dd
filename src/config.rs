// Settings for one lookup run plus the loader for the credential file.
//
// Everything that used to be a process-wide constant (service address,
// file names) lives in `Settings` so each component can be pointed at
// a temp dir or a mock server.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";

/// Locale sent with every request.
pub const LANGUAGE: &str = "en-US";
/// Sub-resources bundled into the details response.
pub const APPEND_TO_RESPONSE: &str = "videos,images";
/// Number of search hits offered for selection.
pub const MAX_RESULTS: usize = 5;

/// Paths and addresses used by a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub config_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Settings {
    /// Build settings from `TMDB_BASE_URL`, `MOVIE_LOOKUP_CONFIG` and
    /// `MOVIE_LOOKUP_OUTPUT`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with a custom variable source.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Settings::default();
        Settings {
            base_url: var("TMDB_BASE_URL").unwrap_or(defaults.base_url),
            config_path: var("MOVIE_LOOKUP_CONFIG")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            output_path: var("MOVIE_LOOKUP_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        }
    }
}

/// Read the JSON settings file and return its `api_key`.
///
/// Read and parse failures are `ConfigRead` / `ConfigParse`; a document
/// without a non-empty string `api_key` is `MissingCredential`.
pub fn load_api_key(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    match doc.get("api_key") {
        Some(Value::String(key)) if !key.is_empty() => {
            tracing::debug!(path = %path.display(), "loaded api key");
            Ok(key.clone())
        }
        _ => Err(Error::MissingCredential {
            path: path.to_path_buf(),
        }),
    }
}
