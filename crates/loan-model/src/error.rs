//! Validation errors for applicant and feedback input.

use thiserror::Error;

/// A categorical value that matches none of the category's levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} value '{value}' (expected one of: {})", expected.join(", "))]
pub struct UnknownLevel {
    /// Category name (e.g. `property_area`).
    pub category: &'static str,
    /// The rejected input.
    pub value: String,
    /// Accepted labels in form order.
    pub expected: Vec<&'static str>,
}

/// Input-constraint violations detected before a submission is accepted.
///
/// These are always recoverable: the submission is rejected, the form keeps
/// its state and the classifier is never invoked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Applicant name is empty or whitespace.
    #[error("applicant name must not be empty")]
    EmptyName,

    /// Requested loan amount is zero or negative.
    #[error("loan amount must be greater than zero (got {value})")]
    NonPositiveLoan { value: f64 },

    /// An income field is negative.
    #[error("{field} must not be negative (got {value})")]
    NegativeIncome { field: &'static str, value: f64 },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    /// Tenure outside the range offered on the form.
    #[error("tenure must be between {min} and {max} years (got {years})")]
    TenureOutOfRange { years: u32, min: u32, max: u32 },

    /// Feedback rating outside 1..=5.
    #[error("rating must be between 1 and 5 (got {value})")]
    RatingOutOfRange { value: i64 },

    /// A categorical value could not be parsed.
    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevel),
}

impl ValidationError {
    /// The input field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::NonPositiveLoan { .. } => "loan_amount",
            Self::NegativeIncome { field, .. } | Self::NonFinite { field } => field,
            Self::TenureOutOfRange { .. } => "tenure_years",
            Self::RatingOutOfRange { .. } => "rating",
            Self::UnknownLevel(err) => err.category,
        }
    }
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
