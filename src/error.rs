//! Error types shared across the player core.

use std::path::PathBuf;

use thiserror::Error;

/// A track candidate could not be turned into a playable `Track`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTrackError {
    #[error("track has no id")]
    MissingId,
    #[error("track {id:?} has no title")]
    MissingTitle { id: String },
    #[error("track {id:?} has neither a preview url nor a file path")]
    MissingLocator { id: String },
}

/// Reading or writing the persisted player state failed.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The transport could not load or drive a source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("unsupported source: {0}")]
    Unsupported(String),
    #[error("failed to open {0}")]
    Open(String),
    #[error("failed to decode {0}")]
    Decode(String),
    #[error("audio thread is gone")]
    Disconnected,
}

/// Importing a file into the library failed.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{0} is not a supported audio file")]
    NotAudio(PathBuf),
    #[error("failed to stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
