//! Error types shared by the deck, its file formats and the study session.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    /// The deck file could not be opened, read or written.
    #[error("cannot access deck file '{}': {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The deck file does not split into question/answer records.
    #[error("malformed deck file: record {record} {reason}")]
    Format { record: usize, reason: String },

    /// A study session operation was attempted when it is not allowed.
    #[error("cannot {action}: {reason}")]
    State {
        action: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;

impl DeckError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeckError::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn state(action: &'static str, reason: impl ToString) -> Self {
        DeckError::State {
            action,
            reason: reason.to_string(),
        }
    }
}
