//! Output formatting for CLI.

mod json;
mod table;
mod text;

pub use json::{ActionOutput, JsonFormatter, ScheduleOutput, SearchOutput};
pub use text::{Style, TextFormatter};
