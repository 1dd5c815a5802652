//! Cache of the timetable for the current ISO week.
//!
//! The file holds the fetched weeks and the moment they were written as
//! fractional epoch seconds:
//!
//! ```json
//! {"schedule": [...], "time_written": 1570000000.5}
//! ```
//!
//! An entry is only served during the ISO week (year and week number) it
//! was written in.

use chrono::{DateTime, Utc};
use osiris_core::ScheduleWeek;
use osiris_core::calendar::same_iso_week;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::error::StoreError;
use crate::persistence::{default_schedule_cache_path, load_json, save_json};

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    schedule: Vec<ScheduleWeek>,
    time_written: f64,
}

/// A cache hit.
#[derive(Debug, Clone)]
pub struct CachedSchedule {
    /// Cached weeks, in the order they were fetched.
    pub weeks: Vec<ScheduleWeek>,
    /// When the cache was written.
    pub written_at: DateTime<Utc>,
}

/// File-backed schedule cache.
#[derive(Debug, Clone)]
pub struct ScheduleCache {
    path: PathBuf,
}

impl ScheduleCache {
    /// Creates a cache backed by `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a cache at `<cache dir>/osiris/schedule.json`.
    pub fn default_location() -> Self {
        Self::with_path(default_schedule_cache_path())
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached weeks if they were written in the ISO week of `now`.
    ///
    /// A missing file is a plain miss; an unreadable one is logged and
    /// treated as a miss.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn read(&self, now: DateTime<Utc>) -> Option<CachedSchedule> {
        let file: CacheFile = match load_json(&self.path).await {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                debug!("No schedule cache");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable schedule cache");
                return None;
            }
        };

        let Some(written_at) = from_epoch_secs(file.time_written) else {
            warn!(time_written = file.time_written, "Ignoring schedule cache with invalid timestamp");
            return None;
        };

        if !same_iso_week(written_at.date_naive(), now.date_naive()) {
            debug!(%written_at, "Schedule cache is from another week");
            return None;
        }

        debug!(weeks = file.schedule.len(), "Schedule cache hit");
        Some(CachedSchedule {
            weeks: file.schedule,
            written_at,
        })
    }

    /// Replaces the cache with `weeks`, stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self, weeks), fields(path = %self.path.display(), weeks = weeks.len()))]
    pub async fn write(&self, weeks: &[ScheduleWeek], now: DateTime<Utc>) -> Result<(), StoreError> {
        let file = CacheFile {
            schedule: weeks.to_vec(),
            time_written: to_epoch_secs(now),
        };
        save_json(&self.path, &file).await
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_epoch_secs(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}
