//! Integration tests for model loading and prediction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use loan_inference::{Classifier, ModelContext, ModelError, sigmoid};
use loan_model::{ApplicantInput, Verdict};
use loan_transform::FeatureSchema;
use loan_transform::columns::{CREDIT_HISTORY, DERIVED_COLUMNS};
use tempfile::TempDir;

const SCHEMA_HEADER: &str = "ApplicantIncome,Credit_History,Property_Area_Urban,Loan_Status_Y";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn schema_csv(dir: &Path) -> PathBuf {
    write(
        dir,
        "cleaned_loan_data.csv",
        &format!("\u{feff}{SCHEMA_HEADER}\n5849,1,1,1\n4583,1,0,0\n"),
    )
}

fn credit_only_artifact(feature_names: Option<&[&str]>) -> String {
    let names = feature_names
        .map(|n| serde_json::to_string(n).unwrap())
        .unwrap_or_else(|| "null".to_string());
    format!(
        r#"{{
            "format_version": 1,
            "name": "credit-only",
            "reported_accuracy": 0.824,
            "feature_names": {names},
            "estimator": {{
                "kind": "logistic_regression",
                "coefficients": [0.0, 4.0, 0.0],
                "intercept": -2.0
            }}
        }}"#
    )
}

#[test]
fn loads_and_predicts_from_files() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let artifact = write(dir.path(), "model.json", &credit_only_artifact(None));

    let context = ModelContext::load(&artifact, &schema).unwrap();
    assert_eq!(context.name(), Some("credit-only"));
    assert_eq!(context.kind(), "logistic_regression");
    assert_eq!(context.reported_accuracy(), Some(0.824));
    assert_eq!(
        context.schema().columns(),
        ["ApplicantIncome", "Credit_History", "Property_Area_Urban"]
    );

    let row = context.features(&ApplicantInput::named("Ayesha"));
    let result = context.predict(&row).unwrap();
    assert_eq!(result.verdict, Verdict::Approved);
    assert!((result.confidence - sigmoid(2.0)).abs() < 1e-12);

    let poor = ApplicantInput {
        credit_history: loan_model::CreditHistory::Poor,
        ..ApplicantInput::named("Ayesha")
    };
    let result = context.predict(&context.features(&poor)).unwrap();
    assert_eq!(result.verdict, Verdict::Rejected);
    assert!((result.confidence - (1.0 - sigmoid(-2.0))).abs() < 1e-12);
}

#[test]
fn positive_label_zero_inverts_probability() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let artifact = write(
        dir.path(),
        "model.json",
        &credit_only_artifact(None).replacen(
            "\"format_version\": 1,",
            "\"format_version\": 1, \"positive_label\": 0,",
            1,
        ),
    );
    let context = ModelContext::load(&artifact, &schema).unwrap();
    let result = context
        .predict(&context.features(&ApplicantInput::named("A")))
        .unwrap();
    assert_eq!(result.verdict, Verdict::Rejected);
}

#[test]
fn recorded_feature_names_must_match_schema() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let artifact = write(
        dir.path(),
        "model.json",
        &credit_only_artifact(Some(&[
            "ApplicantIncome",
            "Property_Area_Urban",
            "Credit_History",
        ])),
    );

    let err = ModelContext::load(&artifact, &schema).unwrap_err();
    match err {
        ModelError::SchemaMismatch { position, .. } => assert_eq!(position, 1),
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn matching_feature_names_load() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let artifact = write(
        dir.path(),
        "model.json",
        &credit_only_artifact(Some(&[
            "ApplicantIncome",
            "Credit_History",
            "Property_Area_Urban",
        ])),
    );
    assert!(ModelContext::load(&artifact, &schema).is_ok());
}

#[test]
fn missing_artifact_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let err = ModelContext::load(&dir.path().join("absent.json"), &schema).unwrap_err();
    assert!(matches!(err, ModelError::ArtifactRead { .. }));
}

#[test]
fn corrupt_artifact_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let schema = schema_csv(dir.path());
    let artifact = write(dir.path(), "model.json", "\u{80}not json");
    let err = ModelContext::load(&artifact, &schema).unwrap_err();
    assert!(matches!(err, ModelError::ArtifactParse { .. }));
}

#[test]
fn wrong_coefficient_count_is_rejected() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "schema.csv", "ApplicantIncome,Credit_History\n");
    let artifact = write(dir.path(), "model.json", &credit_only_artifact(None));
    let err = ModelContext::load(&artifact, &schema).unwrap_err();
    assert!(matches!(err, ModelError::InvalidArtifact { .. }));
}

#[test]
fn missing_schema_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let artifact = write(dir.path(), "model.json", &credit_only_artifact(None));
    let err = ModelContext::load(&artifact, &dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, ModelError::SchemaRead { .. }));
}

#[derive(Debug)]
struct CountingClassifier {
    calls: Arc<AtomicUsize>,
    width: usize,
    probability: f64,
}

impl Classifier for CountingClassifier {
    fn kind(&self) -> &'static str {
        "counting"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn positive_probability(&self, _features: &[f64]) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probability
    }
}

#[test]
fn from_parts_accepts_custom_classifier() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = FeatureSchema::derived();
    let context = ModelContext::from_parts(
        schema,
        Box::new(CountingClassifier {
            calls: Arc::clone(&calls),
            width: DERIVED_COLUMNS.len(),
            probability: 0.3,
        }),
    )
    .unwrap()
    .with_name("fake");

    let row = context.features(&ApplicantInput::named("A"));
    assert_eq!(row.get(CREDIT_HISTORY), Some(1.0));
    let result = context.predict(&row).unwrap();
    assert_eq!(result.verdict, Verdict::Rejected);
    assert!((result.confidence - 0.7).abs() < 1e-12);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn from_parts_rejects_width_mismatch() {
    let err = ModelContext::from_parts(
        FeatureSchema::derived(),
        Box::new(CountingClassifier {
            calls: Arc::new(AtomicUsize::new(0)),
            width: 3,
            probability: 0.5,
        }),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::InvalidArtifact { .. }));
}

#[test]
fn misaligned_row_is_rejected_without_scoring() {
    let calls = Arc::new(AtomicUsize::new(0));
    let context = ModelContext::from_parts(
        FeatureSchema::from_columns(["a", "b"]).unwrap(),
        Box::new(CountingClassifier {
            calls: Arc::clone(&calls),
            width: 2,
            probability: 0.9,
        }),
    )
    .unwrap();

    let mut row = loan_transform::FeatureRow::new();
    row.push("b", 1.0);
    row.push("a", 1.0);
    assert!(matches!(
        context.predict(&row),
        Err(ModelError::SchemaMismatch { position: 0, .. })
    ));

    let mut short = loan_transform::FeatureRow::new();
    short.push("a", 1.0);
    assert!(matches!(
        context.predict(&short),
        Err(ModelError::RowShape {
            expected: 2,
            found: 1
        })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
