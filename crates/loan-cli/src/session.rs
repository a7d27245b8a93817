//! One user's assessment flow: validate, transform, predict, then
//! optionally record feedback against the last prediction.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, SubsecRound};
use loan_feedback::{FeedbackError, FeedbackLog};
use loan_inference::{ModelContext, ModelError};
use loan_model::{
    AccuracyOpinion, ApplicantInput, FeedbackEntry, PredictionResult, Rating, ValidationError,
};
use loan_transform::FeatureRow;
use thiserror::Error;
use tracing::{info, info_span};

use crate::logging::redact_value;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("model unavailable: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error("no prediction to give feedback on; assess an applicant first")]
    NoPrediction,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A scored application.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub input: ApplicantInput,
    pub features: FeatureRow,
    pub result: PredictionResult,
}

/// Per-user state between an assessment and its feedback.
///
/// The model context is shared and read-only; the session only owns the
/// most recent assessment.
#[derive(Debug)]
pub struct AssessmentSession {
    model: Arc<ModelContext>,
    log: FeedbackLog,
    last: Option<Assessment>,
}

impl AssessmentSession {
    pub fn new(model: Arc<ModelContext>, log: FeedbackLog) -> Self {
        Self {
            model,
            log,
            last: None,
        }
    }

    pub fn model(&self) -> &ModelContext {
        &self.model
    }

    pub fn log(&self) -> &FeedbackLog {
        &self.log
    }

    /// The most recent successful assessment.
    pub fn last(&self) -> Option<&Assessment> {
        self.last.as_ref()
    }

    /// Validates and scores `input`.
    ///
    /// Invalid input is rejected before the model is consulted and leaves
    /// the previous assessment in place.
    pub fn assess(&mut self, input: ApplicantInput) -> Result<&Assessment> {
        let span = info_span!("assess", applicant = redact_value(&input.name));
        let _guard = span.enter();

        input.validate()?;
        let features = self.model.features(&input);
        let result = self.model.predict(&features)?;
        info!(
            verdict = %result.verdict,
            confidence = result.confidence,
            "Application scored"
        );
        Ok(&*self.last.insert(Assessment {
            input,
            features,
            result,
        }))
    }

    /// Appends feedback on the last assessment, stamped with local time.
    pub fn record_feedback(
        &self,
        rating: Rating,
        opinion: AccuracyOpinion,
        suggestion: &str,
    ) -> Result<FeedbackEntry> {
        let now = Local::now().naive_local().trunc_subsecs(0);
        self.record_feedback_at(now, rating, opinion, suggestion)
    }

    /// Appends feedback on the last assessment with an explicit timestamp.
    pub fn record_feedback_at(
        &self,
        timestamp: NaiveDateTime,
        rating: Rating,
        opinion: AccuracyOpinion,
        suggestion: &str,
    ) -> Result<FeedbackEntry> {
        let assessment = self.last.as_ref().ok_or(SessionError::NoPrediction)?;
        let entry = FeedbackEntry {
            timestamp,
            user: assessment.input.name.clone(),
            income: assessment.input.income,
            loan_amount: assessment.input.loan_amount,
            prediction: assessment.result.verdict,
            model_confidence: Some(assessment.result.confidence),
            rating,
            opinion,
            suggestion: suggestion.to_string(),
        };
        self.log.append(&entry)?;
        Ok(entry)
    }
}
