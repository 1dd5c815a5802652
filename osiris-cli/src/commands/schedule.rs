//! Schedule command - show the timetable, served from the weekly cache when
//! it holds enough weeks.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::Args;
use osiris_store::{CachedSchedule, ScheduleCache};
use tracing::{debug, info, warn};

use super::emit;
use crate::Cli;
use crate::output::ScheduleOutput;
use crate::session::Session;

/// Arguments for the schedule command.
#[derive(Args, Default)]
pub struct ScheduleArgs {
    /// Number of weeks to show [default: from settings].
    #[arg(short = 'w', long = "n_weeks", value_parser = clap::value_parser!(u32).range(1..))]
    pub n_weeks: Option<u32>,

    /// Ignore the cache and fetch from the portal.
    #[arg(long)]
    pub refresh: bool,
}

/// Runs the schedule command.
pub async fn run(args: &ScheduleArgs, cli: &Cli) -> Result<()> {
    let session = Session::load().await?;
    let settings = session.settings();
    let n_weeks = args.n_weeks.unwrap_or(settings.default_weeks);
    let cache = ScheduleCache::default_location();
    let now = Utc::now();

    let use_cache = settings.schedule_cache_enabled && !args.refresh;
    let cached = if use_cache {
        cache.read(now).await.and_then(|hit| take_weeks(hit, n_weeks))
    } else {
        None
    };

    let (weeks, written_at) = match cached {
        Some(hit) => {
            debug!(weeks = hit.weeks.len(), "Using cached schedule");
            (hit.weeks, Some(hit.written_at))
        }
        None => {
            let client = session.client().await?;
            let weeks = client.schedule(n_weeks).await?;
            info!(weeks = weeks.len(), "Fetched schedule");
            if settings.schedule_cache_enabled {
                if let Err(e) = cache.write(&weeks, now).await {
                    warn!(error = %e, "Failed to write schedule cache");
                }
            }
            (weeks, None)
        }
    };

    let output = ScheduleOutput {
        cached: written_at.is_some(),
        written_at,
        weeks: &weeks,
    };
    emit(cli, &output, |f| {
        let table = f.schedule(&weeks);
        match written_at {
            Some(at) => format!("{}\n{table}", f.note(&cached_note(at))),
            None => table,
        }
    })
}

/// Keeps the first `n_weeks` of a cache hit, or rejects it if it has fewer.
fn take_weeks(mut hit: CachedSchedule, n_weeks: u32) -> Option<CachedSchedule> {
    let wanted = usize::try_from(n_weeks).ok()?;
    if hit.weeks.len() < wanted {
        debug!(cached = hit.weeks.len(), wanted, "Schedule cache too short");
        return None;
    }
    hit.weeks.truncate(wanted);
    Some(hit)
}

fn cached_note(written_at: DateTime<Utc>) -> String {
    let local = written_at.with_timezone(&Local);
    format!("Cached schedule from {}", local.format("%Y-%m-%d %H:%M"))
}
