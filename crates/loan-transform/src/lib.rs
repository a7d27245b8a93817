//! Feature engineering for loan applications.
//!
//! Turns an [`ApplicantInput`](loan_model::ApplicantInput) into the numeric
//! feature row a trained classifier expects:
//!
//! - **Derivation**: scaled loan amount, tenure in months, income totals, the
//!   smoothed income-to-loan ratio and `ln(1 + x)` transforms
//! - **Encoding**: one-hot indicators with the reference level dropped
//! - **Reindexing**: projection onto the model's schema, zero-filling missing
//!   columns and dropping unknown ones
//!
//! Everything here is pure and deterministic.
//!
//! # Example
//!
//! ```
//! use loan_model::ApplicantInput;
//! use loan_transform::{FeatureSchema, transform};
//!
//! let schema = FeatureSchema::from_columns(["ApplicantIncome", "Credit_History"]).unwrap();
//! let row = transform(&ApplicantInput::named("Ayesha"), &schema);
//! assert_eq!(row.values(), [75_000.0, 1.0]);
//! ```

pub mod columns;
mod derive;
mod error;
mod row;
mod schema;

pub use derive::{LOAN_SCALE, MONTHS_PER_YEAR, RATIO_SMOOTHING, derive_features, transform};
pub use error::{Result, SchemaError};
pub use row::FeatureRow;
pub use schema::{FeatureSchema, ReindexReport};
