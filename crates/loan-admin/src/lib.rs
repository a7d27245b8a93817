//! Admin console for the feedback log.
//!
//! A two-state machine (locked/unlocked) guarding view, edit, export and
//! reset of the log. The admin password is only ever held as a SHA-256
//! digest.
//!
//! # Example
//!
//! ```no_run
//! use loan_admin::{AdminConsole, AdminSecret, UnlockOutcome};
//! use loan_feedback::FeedbackLog;
//!
//! # fn main() -> loan_admin::Result<()> {
//! let secret = AdminSecret::from_password("correct horse");
//! let mut console = AdminConsole::new(FeedbackLog::new("feedback_results.csv"), Some(secret));
//! assert_eq!(console.unlock("correct horse")?, UnlockOutcome::Unlocked);
//!
//! let mut session = console.begin_edit()?;
//! session.set_field(0, "Rating", "4")?;
//! console.save(session)?;
//! # Ok(())
//! # }
//! ```

mod console;
mod edit;
mod error;
mod secret;

pub use console::{AdminConsole, ConsoleState, UnlockOutcome};
pub use edit::{EditField, EditSession};
pub use error::{AdminError, Result};
pub use secret::{AdminSecret, sha256_hex};
