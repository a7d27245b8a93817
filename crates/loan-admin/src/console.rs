//! Locked/unlocked admin view over the feedback log.

use std::io::Write;

use loan_feedback::{FeedbackLog, LogSnapshot};
use tracing::{info, warn};

use crate::edit::EditSession;
use crate::error::{AdminError, Result};
use crate::secret::AdminSecret;

/// Console lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleState {
    #[default]
    Locked,
    Unlocked,
}

/// Outcome of an unlock attempt that is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// Nothing was entered; the caller should ask for the password.
    Prompt,
    /// The password matched.
    Unlocked,
}

impl UnlockOutcome {
    /// Text shown for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            UnlockOutcome::Prompt => "Please enter password to view user data.",
            UnlockOutcome::Unlocked => "Welcome back, Admin!",
        }
    }
}

/// Password-gated access to the feedback log.
///
/// Starts locked. Every log operation fails with [`AdminError::Locked`]
/// until [`unlock`](Self::unlock) succeeds.
#[derive(Debug)]
pub struct AdminConsole {
    log: FeedbackLog,
    secret: Option<AdminSecret>,
    state: ConsoleState,
}

impl AdminConsole {
    /// Creates a locked console. With no secret the console can never be
    /// unlocked.
    pub fn new(log: FeedbackLog, secret: Option<AdminSecret>) -> Self {
        Self {
            log,
            secret,
            state: ConsoleState::Locked,
        }
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == ConsoleState::Unlocked
    }

    pub fn log(&self) -> &FeedbackLog {
        &self.log
    }

    /// Attempts to unlock with `attempt`.
    ///
    /// Blank input is not an attempt and yields [`UnlockOutcome::Prompt`]
    /// without changing state. A wrong password leaves the console locked.
    pub fn unlock(&mut self, attempt: &str) -> Result<UnlockOutcome> {
        if attempt.trim().is_empty() {
            return Ok(UnlockOutcome::Prompt);
        }
        let secret = self.secret.as_ref().ok_or(AdminError::SecretNotConfigured)?;
        if secret.verify(attempt) {
            self.state = ConsoleState::Unlocked;
            info!(log = %self.log.path().display(), "Admin console unlocked");
            Ok(UnlockOutcome::Unlocked)
        } else {
            self.state = ConsoleState::Locked;
            warn!("Rejected admin password attempt");
            Err(AdminError::IncorrectPassword)
        }
    }

    /// Locks the console again.
    pub fn logout(&mut self) {
        if self.is_unlocked() {
            info!("Admin console locked");
        }
        self.state = ConsoleState::Locked;
    }

    fn require_unlocked(&self) -> Result<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(AdminError::Locked)
        }
    }

    /// Reads all entries plus any skipped rows.
    pub fn view(&self) -> Result<LogSnapshot> {
        self.require_unlocked()?;
        Ok(self.log.read_all()?)
    }

    /// Starts an edit session over the current entries.
    pub fn begin_edit(&self) -> Result<EditSession> {
        self.require_unlocked()?;
        let snapshot = self.log.read_all()?;
        Ok(EditSession::new(snapshot.entries, snapshot.skipped.len()))
    }

    /// Writes a session's entries back as a full rewrite.
    ///
    /// Returns the number of entries written. An unmodified session is not
    /// written. A session that started with unreadable rows is refused with
    /// [`AdminError::UnreadableRows`] unless it was told to
    /// [discard them](EditSession::discard_unreadable).
    pub fn save(&self, session: EditSession) -> Result<usize> {
        self.require_unlocked()?;
        let len = session.len();
        if !session.is_modified() {
            return Ok(len);
        }
        let unreadable = session.unreadable_rows();
        if unreadable > 0 {
            if !session.discards_unreadable() {
                return Err(AdminError::UnreadableRows { count: unreadable });
            }
            warn!(dropped = unreadable, "Saving edits drops unreadable feedback rows");
        }
        self.log.rewrite(&session.into_entries())?;
        Ok(len)
    }

    /// Deletes the log. Returns whether a file was removed.
    pub fn reset(&self) -> Result<bool> {
        self.require_unlocked()?;
        Ok(self.log.reset()?)
    }

    /// Streams the log unchanged into `out`.
    pub fn export<W: Write + ?Sized>(&self, out: &mut W) -> Result<u64> {
        self.require_unlocked()?;
        Ok(self.log.export(out)?)
    }
}
