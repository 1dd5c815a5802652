// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Osiris CLI - the Radboud student portal from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Sign in once; the token is kept in ~/.osiris_token
//! osiris sign_in
//!
//! # Grades and the next two weeks of the timetable
//! osiris grades
//! osiris schedule -w 2
//!
//! # Find a course and register for it
//! osiris search "Operating Systems"
//! osiris newcourse 123456
//!
//! # JSON output
//! osiris --format json --pretty courses
//! ```

mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use osiris_portal::PortalError;
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{auth, config, grades, register, registrations, schedule, search};
use output::TextFormatter;

/// Printed when the stored token is missing or rejected.
const SIGN_IN_AGAIN: &str = "Please sign in again: osiris sign_in";

// ============================================================================
// CLI Definition
// ============================================================================

/// Osiris CLI - the Radboud student portal.
#[derive(Parser)]
#[command(name = "osiris")]
#[command(about = "Radboud Osiris student portal CLI")]
#[command(long_about = r#"
Osiris shows grades, the timetable and course/test registrations from the
Radboud University student portal, and registers for courses and tests.

Sign in first with `osiris sign_in`. The access token is stored in
~/.osiris_token; run the command again when it expires.

Examples:
  osiris grades                  # Course results
  osiris schedule -w 2           # Next two weeks
  osiris search "Operating"      # Find courses open for registration
  osiris --format json exams     # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no log output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Text formatter honoring `--no-color` and whether stdout is a terminal.
    pub fn text_formatter(&self) -> TextFormatter {
        TextFormatter::new(!self.no_color && std::io::stdout().is_terminal())
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with your s-number and password.
    #[command(name = "sign_in")]
    SignIn(auth::SignInArgs),

    /// Forget the stored token.
    #[command(name = "sign_out")]
    SignOut,

    /// Show course results.
    Grades,

    /// Show the timetable.
    Schedule(schedule::ScheduleArgs),

    /// Show registered, waitlisted and pre-registered courses.
    #[command(visible_alias = "registered")]
    Courses,

    /// Show registered tests.
    Exams,

    /// Search courses open for registration.
    Search(search::SearchArgs),

    /// Register for a course offering.
    #[command(name = "newcourse", visible_alias = "register")]
    NewCourse(register::NewCourseArgs),

    /// Register for a test.
    #[command(name = "newexam")]
    NewExam(register::NewExamArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable tables with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success, including "please sign in again".
    Success = 0,
    /// Any other failure.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("osiris=debug")
    } else {
        EnvFilter::new("osiris=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::SignIn(args) => auth::sign_in_cmd(args, &cli).await,
        Commands::SignOut => auth::sign_out_cmd(&cli).await,
        Commands::Grades => grades::run(&cli).await,
        Commands::Schedule(args) => schedule::run(args, &cli).await,
        Commands::Courses => registrations::courses(&cli).await,
        Commands::Exams => registrations::exams(&cli).await,
        Commands::Search(args) => search::run(args, &cli).await,
        Commands::NewCourse(args) => register::new_course(args, &cli).await,
        Commands::NewExam(args) => register::new_exam(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if needs_sign_in(&e) {
            println!("{SIGN_IN_AGAIN}");
            std::process::exit(ExitCode::Success as i32);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}

/// True for a missing token or a 401 from the student API.
fn needs_sign_in(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<PortalError>())
        .any(PortalError::needs_sign_in)
}
