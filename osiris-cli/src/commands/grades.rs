//! Grades command - show course results.

use anyhow::Result;
use tracing::info;

use super::emit;
use crate::Cli;
use crate::session::Session;

/// Runs the grades command.
pub async fn run(cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let client = session.client().await?;

    let grades = client.grades(session.settings().result_limit).await?;
    info!(count = grades.len(), "Fetched grades");

    emit(cli, &grades, |f| f.grades(&grades))
}
