//! Error types shared by the clients and the sync driver.
//!
//! Failures fall into two classes. [`SetupError`] stops a run: without a
//! collection, a folder or an authenticated Spotify user nothing useful can
//! happen. [`ItemError`] covers a single release that could not be searched,
//! matched or scraped; the run records it and moves on.

use reqwest::StatusCode;
use thiserror::Error;

/// Low-level failure of a single operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),

    #[error("cannot load environment file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with {status} for {url}")]
    Status {
        service: &'static str,
        status: StatusCode,
        url: String,
    },

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Input(String),
}

/// Failures that terminate a sync run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot read {prompt}: {source}")]
    Input {
        prompt: &'static str,
        #[source]
        source: Error,
    },

    #[error("cannot list Discogs collections for {username}: {source}")]
    Collections {
        username: String,
        #[source]
        source: Error,
    },

    #[error("cannot fetch Discogs collection {folder_id}: {source}")]
    Collection {
        folder_id: u64,
        #[source]
        source: Error,
    },

    #[error("cannot fetch Spotify user information: {0}")]
    CurrentUser(#[source] Error),

    #[error("Spotify authentication failed: {0}")]
    Authentication(#[source] Error),
}

/// Which step of the per-release pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    AlbumSearch,
    AlbumTracks,
    TrackSearch,
    Tracklist,
}

impl std::fmt::Display for ItemStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            ItemStage::AlbumSearch => "album search",
            ItemStage::AlbumTracks => "album tracks",
            ItemStage::TrackSearch => "track search",
            ItemStage::Tracklist => "tracklist",
        };
        write!(f, "{}", stage)
    }
}

/// A recoverable failure for one release; the run continues without it.
#[derive(Debug, Error)]
#[error("{stage} failed for '{item}': {source}")]
pub struct ItemError {
    pub item: String,
    pub stage: ItemStage,
    #[source]
    pub source: Error,
}
