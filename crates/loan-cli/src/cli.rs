//! CLI argument definitions for the loan desk.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use loan_cli::admin::FieldAssignment;
use loan_model::{
    AccuracyOpinion, ApplicantInput, CreditHistory, Dependents, Education, Employment, Gender,
    MaritalStatus, PropertyArea,
};

#[derive(Parser)]
#[command(
    name = "loan-desk",
    version,
    about = "Loan eligibility assessment with feedback collection",
    long_about = "Assess loan eligibility with a pre-trained classifier.\n\n\
                  Applicants can rate each prediction; the ratings are appended to a\n\
                  CSV feedback log that an administrator can review, edit and export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include applicant names and amounts in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: platform config dir, or LOAN_DESK_CONFIG).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact (overrides settings).
    #[arg(long = "model", value_name = "PATH", global = true)]
    pub model: Option<PathBuf>,

    /// Schema CSV whose header lists the feature columns (overrides settings).
    #[arg(long = "schema", value_name = "PATH", global = true)]
    pub schema: Option<PathBuf>,

    /// Feedback log (overrides settings).
    #[arg(long = "feedback-log", value_name = "PATH", global = true)]
    pub feedback_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assess one applicant and optionally record feedback.
    Assess(AssessArgs),

    /// Show the loaded model and its feature columns.
    Model,

    /// Password-protected feedback log administration.
    Admin(AdminArgs),

    /// Print the effective settings as TOML.
    Config,
}

#[derive(Args)]
pub struct AssessArgs {
    /// Applicant's full name.
    #[arg(long = "name", default_value = "")]
    pub name: String,

    #[arg(long = "gender", default_value = "Male")]
    pub gender: Gender,

    #[arg(long = "married", default_value = "Yes")]
    pub married: MaritalStatus,

    /// Number of dependents (0, 1, 2, 3+).
    #[arg(long = "dependents", default_value = "0")]
    pub dependents: Dependents,

    #[arg(long = "education", default_value = "Graduate")]
    pub education: Education,

    #[arg(long = "self-employed", default_value = "Yes")]
    pub self_employed: Employment,

    #[arg(long = "property-area", default_value = "Urban")]
    pub property_area: PropertyArea,

    /// Credit record (Good, Poor).
    #[arg(long = "credit-history", default_value = "Good")]
    pub credit_history: CreditHistory,

    /// Monthly income.
    #[arg(long = "income", default_value_t = 75_000.0, allow_negative_numbers = true)]
    pub income: f64,

    /// Co-applicant monthly income.
    #[arg(long = "coapplicant-income", default_value_t = 0.0, allow_negative_numbers = true)]
    pub coapplicant_income: f64,

    /// Requested principal.
    #[arg(long = "loan-amount", default_value_t = 500_000.0, allow_negative_numbers = true)]
    pub loan_amount: f64,

    /// Tenure in years (1-30).
    #[arg(long = "tenure", default_value_t = 15)]
    pub tenure: u32,

    /// Also print the feature row sent to the model.
    #[arg(long = "show-features")]
    pub show_features: bool,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Rate the prediction (1-5) and record feedback.
    #[arg(long = "rating", value_name = "1-5", allow_negative_numbers = true)]
    pub rating: Option<i64>,

    /// Is the prediction accurate? (Yes, Maybe, No)
    #[arg(long = "opinion", default_value = "Yes", requires = "rating")]
    pub opinion: AccuracyOpinion,

    /// Free-text suggestion stored with the feedback.
    #[arg(long = "suggestion", default_value = "", requires = "rating")]
    pub suggestion: String,
}

impl AssessArgs {
    pub fn applicant(&self) -> ApplicantInput {
        ApplicantInput {
            name: self.name.clone(),
            gender: self.gender,
            married: self.married,
            dependents: self.dependents,
            education: self.education,
            employment: self.self_employed,
            property_area: self.property_area,
            credit_history: self.credit_history,
            income: self.income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            tenure_years: self.tenure,
        }
    }
}

#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,

    /// Admin password. Visible to other users in the process list; prefer
    /// --password-stdin.
    #[arg(long = "password", global = true, default_value = "", hide_default_value = true)]
    pub password: String,

    /// Read the admin password from the first line of standard input.
    #[arg(long = "password-stdin", global = true, conflicts_with = "password")]
    pub password_stdin: bool,
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// List all feedback entries.
    View,

    /// Copy the feedback log to a file.
    Export {
        #[arg(long = "output", value_name = "PATH", default_value = "loan_feedback_data.csv")]
        output: PathBuf,
    },

    /// Change or remove entries, then save the log.
    Edit {
        /// Set one field: INDEX:FIELD=VALUE (repeatable).
        #[arg(long = "set", value_name = "INDEX:FIELD=VALUE")]
        set: Vec<FieldAssignment>,

        /// Remove the entry at INDEX (repeatable).
        #[arg(long = "remove", value_name = "INDEX")]
        remove: Vec<usize>,

        /// Save even though unreadable rows in the log will be lost.
        #[arg(long = "drop-unreadable")]
        drop_unreadable: bool,
    },

    /// Delete the feedback log.
    Reset {
        /// Confirm deletion.
        #[arg(long = "yes")]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}
