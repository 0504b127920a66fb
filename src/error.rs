//! Error types for the scraper.
//!
//! Everything except [`DownloadError`] is fatal and propagates to `main`.
//! Download failures are caught per image and turned into failure records.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page request failed or returned an error status
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The input could not be interpreted at all
    #[error("failed to parse page: {0}")]
    Parse(String),

    /// Filesystem error while writing output
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while downloading a single image. Never aborts the run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
