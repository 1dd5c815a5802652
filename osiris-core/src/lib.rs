// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Osiris Core
//!
//! Core types and models for the Osiris student-portal client.
//!
//! The portal speaks Dutch field names (`cursus`, `collegejaar`, `blok`, ...).
//! The models here keep those names on the wire via serde renames and expose
//! English accessors to the rest of the workspace.
//!
//! ## Key Types
//!
//! ### Sign-in
//! - [`Credentials`] - Student number and password (redacted in `Debug`)
//! - [`BearerToken`] - Access token for the student API
//!
//! ### Results & Schedule
//! - [`Grade`] - A single course result
//! - [`ScheduleWeek`], [`ScheduleDay`], [`ScheduleEntry`] - Timetable data
//! - [`ActivityKind`] - Timetable activity type (`soort_rooster`)
//!
//! ### Registrations
//! - [`Course`] - A course the student is (pre)registered or waitlisted for
//! - [`Exam`] - A test occasion the student is registered for
//! - [`CourseInfo`] - Full course record used for course registration
//! - [`CourseTests`], [`TestOccasion`] - Test occasions open for registration
//!
//! ### Search
//! - [`SearchResponse`] - Course search hits
//!
//! ### Calendar
//! - [`calendar::academic_year`] - Academic year of a date
//! - [`calendar::same_iso_week`] - Schedule cache validity check

pub mod calendar;
pub mod credentials;
pub mod error;
pub mod models;

pub use credentials::{BearerToken, Credentials};
pub use error::CoreError;

pub use models::{
    // Results & schedule
    ActivityKind,
    Grade,
    ScheduleDay,
    ScheduleEntry,
    ScheduleWeek,
    // Registrations
    Course,
    CourseInfo,
    CourseTests,
    Exam,
    TestOccasion,
    // Search
    CourseOffering,
    HitTotal,
    SearchHit,
    SearchHits,
    SearchResponse,
    // Helpers
    display_value,
};
