//! Append-only feedback log stored as CSV.
//!
//! # File layout
//!
//! ```text
//! Timestamp,User,Income,Loan_Amount,Prediction,Model_Accuracy,Rating,Accuracy_Opinion,Suggestions
//! "2026-10-17 09:30:00","Ayesha Khan",75000,500000,"Approved",0.87,5,"Yes","Faster results"
//! ```
//!
//! Non-numeric fields are always quoted, so commas and newlines inside
//! suggestions cannot break row boundaries. Files written before the
//! `Model_Accuracy` column existed are still readable.
//!
//! # Concurrency
//!
//! Writers take an exclusive advisory lock on `<log>.lock`; readers take a
//! shared one. Full rewrites go through a temporary file and a rename.

mod error;
mod format;
mod lock;
mod log;

pub use error::{FeedbackError, Result};
pub use format::{COLUMNS, LEGACY_COLUMNS};
pub use log::{DEFAULT_LOG_FILE, FeedbackLog, LogSnapshot, SkippedRow};
