//! Classifier output.

use serde::{Deserialize, Serialize};

use crate::enums::Verdict;

/// Probability above which an application is approved.
pub const APPROVAL_THRESHOLD: f64 = 0.5;

/// Verdict plus the model's probability for that verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub verdict: Verdict,
    /// Probability of the winning class, in `[0, 1]`.
    pub confidence: f64,
}

impl PredictionResult {
    /// Builds a result from the model's probability of approval.
    ///
    /// The probability is clamped to `[0, 1]`. Exactly 0.5 is a rejection,
    /// matching a binary classifier's `predict` on a tie.
    pub fn from_approval_probability(probability: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        if probability > APPROVAL_THRESHOLD {
            Self {
                verdict: Verdict::Approved,
                confidence: probability,
            }
        } else {
            Self {
                verdict: Verdict::Rejected,
                confidence: 1.0 - probability,
            }
        }
    }

    /// Whether the application was approved.
    pub fn is_approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }

    /// Confidence as a percentage, for display.
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    /// One-line headline shown with the verdict.
    pub fn headline(&self) -> String {
        format!("Loan Approval: {}", self.verdict.as_str().to_uppercase())
    }
}
