//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use osiris_core::{CourseOffering, ScheduleWeek, SearchResponse};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// Timetable output, with cache provenance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutput<'a> {
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub written_at: Option<DateTime<Utc>>,
    pub weeks: &'a [ScheduleWeek],
}

/// Course search output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput<'a> {
    pub total: u64,
    pub hits: Vec<&'a CourseOffering>,
}

impl<'a> From<&'a SearchResponse> for SearchOutput<'a> {
    fn from(response: &'a SearchResponse) -> Self {
        Self {
            total: response.hits.total.count(),
            hits: response.hits.hits.iter().map(|h| &h.source).collect(),
        }
    }
}

/// Outcome of a sign-in or registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutput {
    pub action: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionOutput {
    /// Creates an outcome without a status.
    pub fn new(action: &'static str, success: bool) -> Self {
        Self {
            action,
            success,
            status: None,
            message: None,
        }
    }

    /// Attaches the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
