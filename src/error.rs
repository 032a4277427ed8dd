// Error types shared by every layer of the lookup session. Each variant
// renders as the single line printed after `Error: ` by the binary.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The settings file could not be read from disk.
    #[error("Cannot read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Cannot read {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `api_key` is absent, empty or not a string.
    #[error("The field \"api_key\" is missing in {}", path.display())]
    MissingCredential { path: PathBuf },

    #[error("TMDB search error: {status}")]
    SearchRequest { status: StatusCode },

    #[error("TMDB details error: {status}")]
    DetailsRequest { status: StatusCode },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A payload parsed as JSON but lacks the fields the session relies on.
    #[error("Unexpected response from TMDB: {0}")]
    MalformedResponse(String),

    #[error("Invalid request target: {0}")]
    InvalidTarget(#[from] url::ParseError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
