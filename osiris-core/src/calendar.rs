//! Academic calendar helpers.
//!
//! Radboud academic years start in September and are named after the
//! calendar year they start in.

use chrono::{Datelike, NaiveDate};

/// First month of a new academic year.
pub const ACADEMIC_YEAR_START_MONTH: u32 = 9;

/// Returns the academic year `date` falls in.
///
/// ```
/// use chrono::NaiveDate;
/// use osiris_core::calendar::academic_year;
///
/// let spring = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
/// assert_eq!(academic_year(spring), 2019);
/// ```
pub fn academic_year(date: NaiveDate) -> i32 {
    if date.month() < ACADEMIC_YEAR_START_MONTH {
        date.year() - 1
    } else {
        date.year()
    }
}

/// ISO `(year, week)` of a date.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Returns true if both dates fall in the same ISO week.
pub fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
    iso_week(a) == iso_week(b)
}
