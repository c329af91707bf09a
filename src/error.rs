use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for one pipeline run. Every variant is fatal for the
/// current media asset; there are no retries at this level.
#[derive(Error, Debug)]
pub enum SublateError {
    #[error("failed to probe duration of {path:?}: {message}")]
    Probe { path: PathBuf, message: String },

    #[error("{tool} failed on {path:?}: {message}")]
    Tool {
        tool: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("transcription of {path:?} failed: {message}")]
    Transcription { path: PathBuf, message: String },

    #[error("translation to {target} failed: {message}")]
    Translation { target: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SublateError>;
