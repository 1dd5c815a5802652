//! Registered courses and exams.

use anyhow::Result;
use osiris_core::{Course, Exam};
use tracing::info;

use super::emit;
use crate::Cli;
use crate::session::Session;

/// Runs the courses command.
pub async fn courses(cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let client = session.client().await?;

    let courses = sort_courses(client.registered_courses().await?);
    info!(count = courses.len(), "Fetched registered courses");

    emit(cli, &courses, |f| f.courses(&courses))
}

/// Runs the exams command.
pub async fn exams(cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let client = session.client().await?;

    let exams = sort_exams(client.registered_exams(session.settings().result_limit).await?);
    info!(count = exams.len(), "Fetched registered exams");

    emit(cli, &exams, |f| f.exams(&exams))
}

/// Orders courses by year, block and course id.
fn sort_courses(mut courses: Vec<Course>) -> Vec<Course> {
    courses.sort_by_key(Course::sort_key);
    courses
}

/// Orders exams by date; exams without a date come first.
fn sort_exams(mut exams: Vec<Exam>) -> Vec<Exam> {
    exams.sort_by(|a, b| {
        let date = |e: &Exam| e.date.clone().unwrap_or_default();
        date(a).cmp(&date(b))
    });
    exams
}
