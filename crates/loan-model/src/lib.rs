//! Loan desk domain model.
//!
//! Plain data types shared by the transform, inference, feedback and admin
//! crates:
//!
//! - **applicant**: raw form input and its validation rules
//! - **enums**: categorical levels (gender, dependents, property area, ...)
//! - **prediction**: classifier verdict and confidence
//! - **feedback**: feedback log entries and ratings

pub mod applicant;
pub mod enums;
pub mod error;
pub mod feedback;
pub mod prediction;

pub use applicant::{ApplicantInput, MAX_TENURE_YEARS, MIN_TENURE_YEARS};
pub use enums::{
    AccuracyOpinion, CreditHistory, Dependents, Education, Employment, Gender, MaritalStatus,
    PropertyArea, Verdict,
};
pub use error::{Result, UnknownLevel, ValidationError};
pub use feedback::{FeedbackEntry, Rating, TIMESTAMP_FORMAT};
pub use prediction::{APPROVAL_THRESHOLD, PredictionResult};
