//! Course and test registration.

use anyhow::{Context, Result};
use clap::Args;
use inquire::{Confirm, Text};
use osiris_portal::RegistrationOutcome;
use tracing::info;

use super::emit;
use crate::output::{ActionOutput, TextFormatter};
use crate::session::Session;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the newcourse command.
#[derive(Args)]
pub struct NewCourseArgs {
    /// Course offering id (`id_cursus_blok`).
    pub id_cursus_blok: String,

    /// Register without asking for confirmation.
    #[arg(long, short)]
    pub yes: bool,
}

/// Arguments for the newexam command.
#[derive(Args)]
pub struct NewExamArgs {
    /// Course id (`id_cursus`).
    pub id_cursus: String,

    /// Test occasion (`id_toets_gelegenheid`); prompted for when omitted.
    #[arg(long)]
    pub test: Option<String>,
}

/// Shows a course offering and registers for it after confirmation.
pub async fn new_course(args: &NewCourseArgs, cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let client = session.client().await?;

    let info = client.course_info(&args.id_cursus_blok).await?;
    show(cli, |f| f.course_summary(&info));

    let confirmed = args.yes
        || Confirm::new("Confirm registration?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
    if !confirmed {
        return emit(
            cli,
            &ActionOutput::new("newcourse", false).with_message("cancelled"),
            |_| "Registration cancelled".to_string(),
        );
    }

    let outcome = client.register_for_course(&info).await?;
    info!(status = outcome.status, "Course registration sent");
    report(
        cli,
        "newcourse",
        outcome,
        "Registered successfully!",
        "Registration failed. Please try again.",
    )
}

/// Shows the test occasions of a course and registers for the chosen one.
pub async fn new_exam(args: &NewExamArgs, cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let client = session.client().await?;

    let course = client.course_tests(&args.id_cursus).await?;
    show(cli, |f| f.course_tests(&course));

    let occasion_id = match &args.test {
        Some(id) => id.clone(),
        None => Text::new("Which test would you like to register to? id_toets_gelegenheid")
            .prompt()
            .context("Failed to read test id")?,
    };

    let Some(test) = course.find(&occasion_id) else {
        emit(
            cli,
            &ActionOutput::new("newexam", false).with_message("test not found"),
            |f| f.failure("Test not found."),
        )?;
        std::process::exit(ExitCode::Error as i32);
    };

    let outcome = client.register_for_test(test).await?;
    info!(status = outcome.status, "Test registration sent");
    report(
        cli,
        "newexam",
        outcome,
        "Registration successful!",
        "Registration failed.",
    )
}

/// Prints context before a prompt; JSON output stays a single document.
fn show(cli: &Cli, text: impl FnOnce(&TextFormatter) -> String) {
    if cli.format == OutputFormat::Text {
        println!("{}\n", text(&cli.text_formatter()));
    }
}

fn report(
    cli: &Cli,
    action: &'static str,
    outcome: RegistrationOutcome,
    accepted: &str,
    rejected: &str,
) -> Result<()> {
    let output = ActionOutput::new(action, outcome.accepted()).with_status(outcome.status);
    emit(cli, &output, |f| {
        if outcome.accepted() {
            f.success(accepted)
        } else {
            f.failure(rejected)
        }
    })?;
    if !outcome.accepted() {
        std::process::exit(ExitCode::Error as i32);
    }
    Ok(())
}
