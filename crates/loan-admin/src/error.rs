use loan_feedback::FeedbackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    /// The console must be unlocked first.
    #[error("admin console is locked")]
    Locked,

    /// A non-empty password did not match.
    #[error("incorrect password")]
    IncorrectPassword,

    /// No admin secret is configured, so the console cannot be unlocked.
    #[error("no admin password is configured")]
    SecretNotConfigured,

    /// A configured digest is not 64 hex characters.
    #[error("invalid admin password digest: {reason}")]
    InvalidSecret { reason: String },

    /// An edit referred to a row that does not exist.
    #[error("row {index} does not exist (log has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    /// An edit named a column the log does not have.
    #[error("unknown column '{field}'")]
    UnknownField { field: String },

    /// An edit value could not be parsed for its column.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Saving would discard log rows that could not be parsed.
    #[error("the feedback log has {count} unreadable rows that saving would discard")]
    UnreadableRows { count: usize },

    /// The underlying log operation failed.
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}

pub type Result<T> = std::result::Result<T, AdminError>;
