//! Feedback log error types.
//!
//! Every error carries the path involved and offers a user-facing message
//! plus an optional remediation hint.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    /// File I/O error.
    #[error("failed to {operation} feedback log: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed at the file level.
    #[error("failed to {operation} feedback log as CSV: {path}")]
    Csv {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row is not the expected column list.
    #[error("feedback log header does not match the expected columns: {path}")]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Export was requested but no log exists yet.
    #[error("feedback log not found: {path}")]
    NotFound { path: PathBuf },

    /// The advisory lock could not be taken.
    #[error("failed to lock feedback log: {path}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rewritten log could not be moved into place.
    #[error("failed to replace feedback log")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedbackError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            }
            | Self::Csv {
                operation, path, ..
            } => {
                format!("Could not {} the feedback file at {}", operation, path.display())
            }
            Self::HeaderMismatch { path, found, .. } => {
                format!(
                    "The feedback file at {} has unexpected columns ({}).",
                    path.display(),
                    found.join(", ")
                )
            }
            Self::NotFound { .. } => "No feedback data found yet.".to_string(),
            Self::Lock { path, .. } => {
                format!(
                    "The feedback file at {} is in use and could not be locked.",
                    path.display()
                )
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the feedback file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } | Self::Csv { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::HeaderMismatch { .. } => {
                Some("Export a copy if needed, then reset the feedback log.".into())
            }
            Self::NotFound { .. } => None,
            Self::Lock { .. } => Some("Close other loan-desk sessions and retry.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or check directory permissions.".into())
            }
        }
    }
}

/// Result type alias for feedback log operations.
pub type Result<T> = std::result::Result<T, FeedbackError>;
