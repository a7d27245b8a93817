//! Loan desk CLI.

use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser};
use loan_admin::AdminError;
use loan_cli::config::{CONFIG_ENV, Settings, resolve_settings};
use loan_cli::exit::{FAILURE, exit_code, feedback_cause};
use loan_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::debug;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_admin, run_assess, run_config, run_model};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(FAILURE);
    }

    let exit_code = match settings_from_cli(&cli) {
        Ok(settings) => {
            let result = match &cli.command {
                Command::Assess(args) => run_assess(&settings, args),
                Command::Model => run_model(&settings),
                Command::Config => run_config(&settings),
                Command::Admin(args) => run_admin(&settings, args),
            };
            result.unwrap_or_else(|error| report(&error))
        }
        Err(error) => report(&error),
    };
    std::process::exit(exit_code);
}

/// Prints an error with any hint the log layer offers and picks the exit code.
fn report(error: &anyhow::Error) -> i32 {
    match feedback_cause(error) {
        Some(inner) => {
            debug!(error = %format!("{error:#}"), "Feedback log operation failed");
            eprintln!("error: {}", inner.user_message());
            if let Some(hint) = inner.suggestion() {
                eprintln!("hint: {hint}");
            }
        }
        None => eprintln!("error: {error:#}"),
    }
    let unreadable = error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<AdminError>(),
            Some(AdminError::UnreadableRows { .. })
        )
    });
    if unreadable {
        eprintln!("hint: export a copy first, then rerun with --drop-unreadable to save anyway.");
    }
    exit_code(error)
}

/// Settings file, then command-line path overrides.
fn settings_from_cli(cli: &Cli) -> anyhow::Result<Settings> {
    let explicit = cli
        .config
        .clone()
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    let mut settings = resolve_settings(explicit.as_deref())?;
    if let Some(path) = &cli.model {
        settings.model.artifact = path.clone();
    }
    if let Some(path) = &cli.schema {
        settings.model.schema = path.clone();
    }
    if let Some(path) = &cli.feedback_log {
        settings.feedback.path = path.clone();
    }
    Ok(settings)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
