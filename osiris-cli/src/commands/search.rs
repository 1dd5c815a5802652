//! Search command - find courses open for registration.

use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;
use osiris_portal::CourseQuery;
use tracing::info;

use super::emit;
use crate::Cli;
use crate::output::SearchOutput;
use crate::session::Session;

/// Arguments for the search command.
#[derive(Args, Default)]
pub struct SearchArgs {
    /// Course code or name prefix.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Academic year to search in [default: current].
    #[arg(long)]
    pub year: Option<i32>,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let text = args.query.join(" ");
    if text.trim().is_empty() {
        bail!("Search query must not be empty");
    }

    let mut query = CourseQuery::new(text.trim(), Local::now().date_naive());
    if let Some(year) = args.year {
        query = query.in_year(year);
    }

    let session = Session::load().await?;
    let client = session.client().await?;
    let response = client.search_courses(&query).await?;
    info!(
        year = query.academic_year(),
        hits = response.hits.total.count(),
        "Searched courses"
    );

    emit(cli, &SearchOutput::from(&response), |f| f.search(&response))
}
