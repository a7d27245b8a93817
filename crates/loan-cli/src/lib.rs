//! Loan desk command line.
//!
//! The binary (`loan-desk`) is a thin shell over these modules:
//!
//! - **config**: TOML settings and admin secret resolution
//! - **logging**: `tracing` subscriber setup with value redaction
//! - **session**: one applicant assessment and its optional feedback
//! - **admin**: parsing of staged admin edits
//! - **render**: terminal tables and JSON reports
//! - **exit**: mapping of errors to process exit codes

pub mod admin;
pub mod config;
pub mod exit;
pub mod logging;
pub mod render;
pub mod session;
