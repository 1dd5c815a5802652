//! Weekly timetable (`rooster/per_week`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;

// ============================================================================
// Week / Day
// ============================================================================

/// One week of the timetable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleWeek {
    /// ISO week number (`week`).
    #[serde(default, deserialize_with = "lenient::integer")]
    pub week: Option<i64>,
    /// Days of the week, Monday first (`dagen`).
    #[serde(rename = "dagen", default)]
    pub days: Vec<ScheduleDay>,
}

impl ScheduleWeek {
    /// Returns true if no day in this week has any activity.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.entries.is_empty())
    }
}

/// One day of a timetable week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Date of the day (`datum`), when the portal sends it.
    #[serde(rename = "datum", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Activities on this day (`rooster`).
    #[serde(rename = "rooster", default)]
    pub entries: Vec<ScheduleEntry>,
}

// ============================================================================
// Entry
// ============================================================================

/// A single timetable activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Subject line (`onderwerp`), prefixed with the course code.
    #[serde(rename = "onderwerp", default)]
    pub subject: String,
    /// Activity type code (`soort_rooster`).
    #[serde(rename = "soort_rooster", default)]
    pub kind: String,
    /// Start time (`tijd_vanaf`).
    #[serde(rename = "tijd_vanaf", default, deserialize_with = "lenient::string")]
    pub starts_at: Option<String>,
    /// End time (`tijd_tm`).
    #[serde(rename = "tijd_tm", default, deserialize_with = "lenient::string")]
    pub ends_at: Option<String>,
    /// Room (`locatie`).
    #[serde(rename = "locatie", default, deserialize_with = "lenient::string")]
    pub location: Option<String>,
}

impl ScheduleEntry {
    /// Subject without its leading course code.
    ///
    /// `"NWI-IBC019 Operating Systems"` becomes `"Operating Systems"`.
    /// A subject without a space is returned unchanged.
    pub fn title(&self) -> &str {
        match self.subject.find(' ') {
            Some(idx) => &self.subject[idx + 1..],
            None => &self.subject,
        }
    }

    /// Parsed activity type.
    pub fn activity(&self) -> ActivityKind {
        ActivityKind::from_code(&self.kind)
    }
}

// ============================================================================
// Activity Kind
// ============================================================================

/// Timetable activity types (`soort_rooster`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// `LEC`
    Lecture,
    /// `TUT`
    Tutorial,
    /// `DIGI-INZAGE`
    ExamReview,
    /// `EXA`
    Exam,
    /// `COMP`
    ComputerLab,
    /// `DLT`
    Deadline,
    /// `PRE`
    Presentation,
    /// `LAB`
    Lab,
    /// `RSP`
    Response,
    /// Any code not listed above.
    Other(String),
}

impl ActivityKind {
    /// Parses a portal activity code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "LEC" => Self::Lecture,
            "TUT" => Self::Tutorial,
            "DIGI-INZAGE" => Self::ExamReview,
            "EXA" => Self::Exam,
            "COMP" => Self::ComputerLab,
            "DLT" => Self::Deadline,
            "PRE" => Self::Presentation,
            "LAB" => Self::Lab,
            "RSP" => Self::Response,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the portal code for this activity.
    pub fn code(&self) -> &str {
        match self {
            Self::Lecture => "LEC",
            Self::Tutorial => "TUT",
            Self::ExamReview => "DIGI-INZAGE",
            Self::Exam => "EXA",
            Self::ComputerLab => "COMP",
            Self::Deadline => "DLT",
            Self::Presentation => "PRE",
            Self::Lab => "LAB",
            Self::Response => "RSP",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
