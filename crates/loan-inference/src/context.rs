//! Loaded model plus schema, built once and shared read-only.

use std::path::Path;

use loan_model::{ApplicantInput, PredictionResult};
use loan_transform::{FeatureRow, FeatureSchema, transform};
use tracing::{debug, info};

use crate::artifact::ModelArtifact;
use crate::classifier::Classifier;
use crate::error::{ModelError, Result};
use crate::schema::load_schema;

/// Immutable inference context.
///
/// Holds everything needed to score an application. Nothing in here
/// changes after construction, so a context can be shared freely between
/// threads behind a plain reference or `Arc`.
#[derive(Debug)]
pub struct ModelContext {
    name: Option<String>,
    schema: FeatureSchema,
    classifier: Box<dyn Classifier>,
    positive_label: u8,
    reported_accuracy: Option<f64>,
}

/// Index of the first position where two column lists differ.
fn first_difference(left: &[String], right: &[String]) -> usize {
    left.iter()
        .zip(right)
        .position(|(l, r)| l != r)
        .unwrap_or_else(|| left.len().min(right.len()))
}

impl ModelContext {
    /// Loads the classifier artifact and the schema source.
    ///
    /// When the artifact records its training columns they must equal the
    /// schema header column for column; any drift fails the load.
    pub fn load(artifact_path: &Path, schema_path: &Path) -> Result<Self> {
        let schema = load_schema(schema_path)?;
        let artifact = ModelArtifact::from_path(artifact_path)?;

        if let Some(expected) = &artifact.feature_names
            && expected.as_slice() != schema.columns()
        {
            return Err(ModelError::SchemaMismatch {
                position: first_difference(expected, schema.columns()),
                expected: expected.clone(),
                found: schema.columns().to_vec(),
            });
        }

        let classifier = artifact.build_classifier(schema.len())?;
        info!(
            artifact = %artifact_path.display(),
            model = artifact.name.as_deref().unwrap_or("unnamed"),
            kind = classifier.kind(),
            features = schema.len(),
            "Model loaded"
        );
        Ok(Self {
            name: artifact.name,
            schema,
            classifier,
            positive_label: artifact.positive_label,
            reported_accuracy: artifact.reported_accuracy,
        })
    }

    /// Builds a context from an already-constructed classifier.
    ///
    /// The classifier scores approval directly (positive label 1).
    pub fn from_parts(schema: FeatureSchema, classifier: Box<dyn Classifier>) -> Result<Self> {
        if classifier.width() != schema.len() {
            return Err(ModelError::invalid(format!(
                "classifier expects {} features, schema has {}",
                classifier.width(),
                schema.len()
            )));
        }
        Ok(Self {
            name: None,
            schema,
            classifier,
            positive_label: 1,
            reported_accuracy: None,
        })
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Accuracy the exporter recorded for this model, if any.
    pub fn reported_accuracy(&self) -> Option<f64> {
        self.reported_accuracy
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature row for `input` aligned with this model's schema.
    pub fn features(&self, input: &ApplicantInput) -> FeatureRow {
        transform(input, &self.schema)
    }

    /// Scores a feature row.
    ///
    /// The row must carry the schema's columns in schema order, which is
    /// what [`features`](Self::features) produces.
    pub fn predict(&self, row: &FeatureRow) -> Result<PredictionResult> {
        if row.len() != self.schema.len() {
            return Err(ModelError::RowShape {
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        if row.names() != self.schema.columns() {
            return Err(ModelError::SchemaMismatch {
                position: first_difference(self.schema.columns(), row.names()),
                expected: self.schema.columns().to_vec(),
                found: row.names().to_vec(),
            });
        }

        let class_one = self.classifier.positive_probability(row.values());
        if !class_one.is_finite() {
            return Err(ModelError::NonFiniteProbability);
        }
        let approval = if self.positive_label == 1 {
            class_one
        } else {
            1.0 - class_one
        };
        let result = PredictionResult::from_approval_probability(approval);
        debug!(
            verdict = %result.verdict,
            confidence = result.confidence,
            "Prediction computed"
        );
        Ok(result)
    }
}
