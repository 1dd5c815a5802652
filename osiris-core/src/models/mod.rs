//! Domain models for Osiris.
//!
//! This module contains the data structures returned by (and sent to) the
//! Osiris student API.
//!
//! ## Submodules
//!
//! - [`results`] - Grades
//! - [`schedule`] - Weekly timetable
//! - [`registration`] - Registered courses/exams and registration payloads
//! - [`search`] - Course search results

mod lenient;
mod registration;
mod results;
mod schedule;
mod search;

pub use lenient::display_value;
pub use registration::{Course, CourseInfo, CourseTests, Exam, TestOccasion};
pub use results::Grade;
pub use schedule::{ActivityKind, ScheduleDay, ScheduleEntry, ScheduleWeek};
pub use search::{CourseOffering, HitTotal, SearchHit, SearchHits, SearchResponse};
#[cfg(test)]
mod serde_tests;
