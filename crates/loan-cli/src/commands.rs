use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use loan_admin::{AdminConsole, UnlockOutcome};
use loan_cli::admin::{read_password, stage_edits};
use loan_cli::config::{Settings, resolve_admin_secret};
use loan_cli::exit::{REJECTED, Refused, SUCCESS};
use loan_cli::render::{
    AssessmentReport, assessment_table, entries_table, features_table, model_summary,
    model_table, skipped_table,
};
use loan_cli::session::AssessmentSession;
use loan_feedback::FeedbackLog;
use loan_inference::ModelContext;
use loan_model::Rating;
use tracing::{info, info_span};

use crate::cli::{AdminAction, AdminArgs, AssessArgs, OutputFormatArg};

const NO_FEEDBACK: &str = "No feedback data found yet.";

fn load_model(settings: &Settings) -> Result<ModelContext> {
    ModelContext::load(&settings.model.artifact, &settings.model.schema).with_context(|| {
        format!(
            "model or data files missing (artifact {}, schema {})",
            settings.model.artifact.display(),
            settings.model.schema.display()
        )
    })
}

pub fn run_assess(settings: &Settings, args: &AssessArgs) -> Result<i32> {
    let span = info_span!("assess_command");
    let _guard = span.enter();

    let input = args.applicant();
    input.validate()?;
    let rating = args.rating.map(Rating::new).transpose()?;

    let model = Arc::new(load_model(settings)?);
    let reported_accuracy = model.reported_accuracy();
    let mut session = AssessmentSession::new(model, FeedbackLog::new(&settings.feedback.path));

    let assessment = session.assess(input)?;
    match args.format {
        OutputFormatArg::Table => {
            println!("{}", assessment_table(assessment, reported_accuracy));
            if args.show_features {
                println!("{}", features_table(&assessment.features));
            }
        }
        OutputFormatArg::Json => {
            let report = AssessmentReport::new(assessment, reported_accuracy, args.show_features);
            let json = serde_json::to_string_pretty(&report).context("serialize assessment")?;
            println!("{json}");
        }
    }

    if let Some(rating) = rating {
        session
            .record_feedback(rating, args.opinion, &args.suggestion)
            .context("record feedback")?;
        if args.format == OutputFormatArg::Table {
            println!("Thank you! Your feedback has been recorded.");
        }
    }
    Ok(SUCCESS)
}

pub fn run_config(settings: &Settings) -> Result<i32> {
    print!("{}", settings.to_toml()?);
    Ok(SUCCESS)
}

pub fn run_model(settings: &Settings) -> Result<i32> {
    let model = load_model(settings)?;
    println!("{}", model_summary(&model));
    println!("{}", model_table(&model));
    Ok(SUCCESS)
}

pub fn run_admin(settings: &Settings, args: &AdminArgs) -> Result<i32> {
    let span = info_span!("admin_command");
    let _guard = span.enter();

    let secret = resolve_admin_secret(&settings.admin, |name| std::env::var(name).ok())?;
    let mut console = AdminConsole::new(FeedbackLog::new(&settings.feedback.path), secret);
    let attempt = if args.password_stdin {
        read_password(io::stdin().lock()).context("read admin password from stdin")?
    } else {
        args.password.clone()
    };
    let outcome = console.unlock(&attempt)?;
    println!("{}", outcome.message());
    if outcome == UnlockOutcome::Prompt {
        return Ok(REJECTED);
    }

    match &args.action {
        AdminAction::View => {
            let snapshot = console.view()?;
            if !snapshot.exists {
                println!("{NO_FEEDBACK}");
                return Ok(SUCCESS);
            }
            println!("{}", entries_table(&snapshot.entries));
            println!("Total entries: {}", snapshot.len());
            if !snapshot.skipped.is_empty() {
                println!("Skipped {} unreadable rows:", snapshot.skipped.len());
                println!("{}", skipped_table(&snapshot.skipped));
            }
        }
        AdminAction::Export { output } => {
            if !console.log().exists() {
                println!("{NO_FEEDBACK}");
                return Ok(SUCCESS);
            }
            let file = File::create(output)
                .with_context(|| format!("create export file {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            let bytes = console.export(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("write export file {}", output.display()))?;
            info!(bytes, output = %output.display(), "Feedback log exported");
            println!("Exported {bytes} bytes to {}", output.display());
        }
        AdminAction::Edit {
            set,
            remove,
            drop_unreadable,
        } => {
            if set.is_empty() && remove.is_empty() {
                return Err(Refused("nothing to change: pass --set or --remove".to_string()).into());
            }
            let mut session = console.begin_edit()?;
            stage_edits(&mut session, set, remove)?;
            if *drop_unreadable {
                session.discard_unreadable();
            }
            let dropped = session.unreadable_rows();
            let written = console.save(session)?;
            println!("Saved {written} entries.");
            if dropped > 0 {
                println!("Dropped {dropped} unreadable rows.");
            }
        }
        AdminAction::Reset { yes } => {
            if !yes {
                return Err(
                    Refused("refusing to delete the feedback log without --yes".to_string()).into(),
                );
            }
            if console.reset()? {
                println!("Feedback log deleted.");
            } else {
                println!("{NO_FEEDBACK}");
            }
        }
    }
    console.logout();
    Ok(SUCCESS)
}
