//! On-disk model artifact.
//!
//! The artifact is a JSON document exported from the training environment:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "name": "best_loan_model",
//!   "feature_names": ["ApplicantIncome", "..."],
//!   "positive_label": 1,
//!   "estimator": { "kind": "logistic_regression", "coefficients": [...], "intercept": -0.4 }
//! }
//! ```
//!
//! Estimators score the probability of class `1`; `positive_label` says
//! whether class `1` or class `0` means "approved".

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{
    Classifier, DecisionTree, LogisticRegression, StandardScaler, TreeEnsemble,
};
use crate::error::{ModelError, Result};

/// Artifact layout version this crate reads and writes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

fn default_positive_label() -> u8 {
    1
}

/// Deserialized artifact, before validation against a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Column order the estimator was fitted on, when the exporter recorded it.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Class label that means "approved" (0 or 1).
    #[serde(default = "default_positive_label")]
    pub positive_label: u8,
    /// Hold-out accuracy measured at training time, in `[0, 1]`.
    #[serde(default)]
    pub reported_accuracy: Option<f64>,
    pub estimator: EstimatorSpec,
}

/// Estimator parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        scaler: Option<StandardScaler>,
    },
    TreeEnsemble {
        trees: Vec<DecisionTree>,
    },
}

impl EstimatorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::TreeEnsemble { .. } => "tree_ensemble",
        }
    }
}

impl ModelArtifact {
    /// Reads and parses an artifact file, checking its format version.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Self =
            serde_json::from_str(&text).map_err(|source| ModelError::ArtifactParse {
                path: path.to_path_buf(),
                source,
            })?;
        artifact.check_version()?;
        Ok(artifact)
    }

    fn check_version(&self) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: self.format_version,
                supported: ARTIFACT_FORMAT_VERSION,
            });
        }
        if let Some(accuracy) = self.reported_accuracy
            && !(0.0..=1.0).contains(&accuracy)
        {
            return Err(ModelError::invalid(format!(
                "reported_accuracy must be within [0, 1] (got {accuracy})"
            )));
        }
        if self.positive_label > 1 {
            return Err(ModelError::invalid(format!(
                "positive_label must be 0 or 1 (got {})",
                self.positive_label
            )));
        }
        Ok(())
    }

    /// Builds the classifier, validating its shape against `width` features.
    pub fn build_classifier(&self, width: usize) -> Result<Box<dyn Classifier>> {
        match &self.estimator {
            EstimatorSpec::LogisticRegression {
                coefficients,
                intercept,
                scaler,
            } => {
                if coefficients.len() != width {
                    return Err(ModelError::invalid(format!(
                        "logistic regression has {} coefficients for {} features",
                        coefficients.len(),
                        width
                    )));
                }
                let model =
                    LogisticRegression::new(coefficients.clone(), *intercept, scaler.clone())?;
                Ok(Box::new(model))
            }
            EstimatorSpec::TreeEnsemble { trees } => {
                Ok(Box::new(TreeEnsemble::new(trees.clone(), width)?))
            }
        }
    }
}
