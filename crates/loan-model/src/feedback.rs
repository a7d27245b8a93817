//! Feedback entries recorded after a prediction.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{AccuracyOpinion, Verdict};
use crate::error::{Result, ValidationError};

/// Timestamp layout used in the feedback log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A 1-5 star rating of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates a rating, rejecting values outside 1..=5.
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the feedback log.
///
/// Captures the applicant context and the model's answer at the moment the
/// feedback was submitted, so later model changes do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: NaiveDateTime,
    pub user: String,
    pub income: f64,
    pub loan_amount: f64,
    pub prediction: Verdict,
    /// Model confidence for `prediction`, in `[0, 1]`. Absent on rows
    /// written before confidence was recorded.
    pub model_confidence: Option<f64>,
    pub rating: Rating,
    pub opinion: AccuracyOpinion,
    pub suggestion: String,
}

impl FeedbackEntry {
    /// Timestamp rendered in the log format.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
