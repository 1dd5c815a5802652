//! CLI command implementations.

pub mod auth;
pub mod config;
pub mod grades;
pub mod register;
pub mod registrations;
pub mod schedule;
pub mod search;

use anyhow::Result;
use serde::Serialize;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Prints `data` as JSON, or the text produced by `text`.
pub fn emit<T, F>(cli: &Cli, data: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&TextFormatter) -> String,
{
    match cli.format {
        OutputFormat::Text => println!("{}", text(&cli.text_formatter())),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(data)?),
    }
    Ok(())
}
