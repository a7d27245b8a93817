//! Process exit codes.

use loan_admin::AdminError;
use loan_feedback::FeedbackError;
use loan_model::ValidationError;

use crate::session::SessionError;

pub const SUCCESS: i32 = 0;
/// Runtime failure: model, filesystem or log problems.
pub const FAILURE: i32 = 1;
/// Rejected input or failed authentication.
pub const REJECTED: i32 = 2;

/// User-facing refusal that is not a library error.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Refused(pub String);

/// Exit code for an error that ended a command.
///
/// Walks the whole error chain, so context added with `anyhow` does not
/// hide the cause.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if cause.is::<ValidationError>() || cause.is::<Refused>() {
            return REJECTED;
        }
        if let Some(SessionError::Invalid(_) | SessionError::NoPrediction) =
            cause.downcast_ref::<SessionError>()
        {
            return REJECTED;
        }
        if let Some(admin) = cause.downcast_ref::<AdminError>() {
            return match admin {
                AdminError::Feedback(_) => FAILURE,
                _ => REJECTED,
            };
        }
    }
    FAILURE
}

/// The feedback log failure behind `error`, if any.
///
/// The admin console and the assessment session wrap log errors
/// transparently, which hides them from a plain chain walk.
pub fn feedback_cause(error: &anyhow::Error) -> Option<&FeedbackError> {
    error.chain().find_map(|cause| {
        if let Some(inner) = cause.downcast_ref::<FeedbackError>() {
            return Some(inner);
        }
        if let Some(AdminError::Feedback(inner)) = cause.downcast_ref::<AdminError>() {
            return Some(inner);
        }
        match cause.downcast_ref::<SessionError>() {
            Some(SessionError::Feedback(inner)) => Some(inner),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn auth_and_input_errors_are_rejections() {
        let wrong: anyhow::Error = AdminError::IncorrectPassword.into();
        assert_eq!(exit_code(&wrong), REJECTED);

        let invalid: Result<(), ValidationError> = Err(ValidationError::EmptyName);
        let wrapped = invalid.context("assessment rejected").unwrap_err();
        assert_eq!(exit_code(&wrapped), REJECTED);

        let refused = anyhow::Error::new(Refused("pass --yes".to_string()));
        assert_eq!(exit_code(&refused), REJECTED);

        let unreadable: anyhow::Error = AdminError::UnreadableRows { count: 2 }.into();
        assert_eq!(exit_code(&unreadable), REJECTED);
    }

    #[test]
    fn other_errors_are_failures() {
        let io = anyhow::Error::new(std::io::Error::other("disk full"));
        assert_eq!(exit_code(&io), FAILURE);

        let missing = anyhow::Error::new(SessionError::Feedback(
            loan_feedback::FeedbackError::NotFound {
                path: "feedback_results.csv".into(),
            },
        ));
        assert_eq!(exit_code(&missing), FAILURE);
    }

    #[test]
    fn log_failures_are_found_behind_wrappers() {
        let not_found = || FeedbackError::NotFound {
            path: "feedback_results.csv".into(),
        };

        let session = anyhow::Error::new(SessionError::Feedback(not_found()))
            .context("record feedback");
        let found = feedback_cause(&session).unwrap();
        assert!(matches!(found, FeedbackError::NotFound { .. }));
        assert_eq!(found.user_message(), "No feedback data found yet.");

        let admin = anyhow::Error::new(AdminError::Feedback(not_found()));
        assert!(feedback_cause(&admin).is_some());

        let plain = anyhow::Error::new(not_found());
        assert!(feedback_cause(&plain).is_some());

        let wrong: anyhow::Error = AdminError::IncorrectPassword.into();
        assert!(feedback_cause(&wrong).is_none());
    }
}
