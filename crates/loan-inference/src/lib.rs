//! Model adapter for loan approval.
//!
//! Loads a pre-trained binary classifier from a JSON artifact together with
//! the feature schema (the header of the training CSV), and turns feature
//! rows into [`PredictionResult`](loan_model::PredictionResult)s.
//!
//! Two estimator families are supported: logistic regression (optionally
//! with standardization) and soft-voting tree ensembles. Custom classifiers
//! can be plugged in through [`ModelContext::from_parts`].

mod artifact;
mod classifier;
mod context;
mod error;
mod schema;

pub use artifact::{ARTIFACT_FORMAT_VERSION, EstimatorSpec, ModelArtifact};
pub use classifier::{
    Classifier, DecisionTree, LogisticRegression, StandardScaler, TreeEnsemble, TreeNode, sigmoid,
};
pub use context::ModelContext;
pub use error::{ModelError, Result};
pub use schema::load_schema;
