//! Model loading and prediction errors.
//!
//! Any error from [`ModelContext::load`](crate::ModelContext::load) means the
//! model is unavailable: callers should refuse submissions and show the
//! diagnostic rather than retry.

use std::path::PathBuf;

use loan_transform::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("failed to read model artifact: {path}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid JSON or does not match the artifact layout.
    #[error("failed to parse model artifact: {path}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact was written by an unknown exporter version.
    #[error("model artifact version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The artifact parsed but its contents are inconsistent.
    #[error("invalid model artifact: {reason}")]
    InvalidArtifact { reason: String },

    /// The schema source could not be read as CSV.
    #[error("failed to read feature schema: {path}")]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The schema header is not a usable column list.
    #[error("invalid feature schema in {path}")]
    InvalidSchema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// The artifact's recorded feature names disagree with the schema source.
    #[error(
        "model was trained on {} features but the schema lists {}; first difference at column {position}",
        expected.len(),
        found.len()
    )]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
        position: usize,
    },

    /// A feature row does not have the schema's columns.
    #[error("feature row has {found} columns, model expects {expected}")]
    RowShape { expected: usize, found: usize },

    /// The classifier produced NaN or an infinite score.
    #[error("classifier returned a non-finite probability")]
    NonFiniteProbability,
}

impl ModelError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
