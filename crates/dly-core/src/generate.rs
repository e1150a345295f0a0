//! Metric generators.
//!
//! Each generator is a pure function from a day's entries to one
//! [`ActivityMetric`] for an explicitly supplied date; nothing here reads
//! the wall clock. Sum-based generation is total over empty input, while
//! the wake/bed generators are not and must be guarded by their callers.

use chrono::{NaiveDate, Offset, Timelike, Utc};
use thiserror::Error;
use tracing::warn;

use crate::category::Category;
use crate::day::{self, DayWindow, MINUTES_PER_DAY};
use crate::entry::TimeEntry;
use crate::metric::{ActivityMetric, Period, Unit};

/// Title of the gap-complement metric over a whole day.
///
/// Part of the same frozen title contract as [`Category::metric_title`].
pub const UNRECORDED_TIME_TITLE: &str = "Unrecorded Time";

/// Errors from metric generators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A timestamp-derived generator was invoked with no entries.
    #[error("cannot generate the {metric} metric from empty time entries")]
    EmptyInput { metric: &'static str },
}

/// Sums entry durations into a minute-valued metric titled `title`.
///
/// The `duration` fields are trusted as supplied; start/stop play no part.
/// An empty list sums to zero minutes rather than erroring.
#[must_use]
pub fn sum_duration_metric(entries: &[TimeEntry], date: NaiveDate, title: &str) -> ActivityMetric {
    let total_seconds: i64 = entries.iter().map(|entry| entry.duration).sum();

    ActivityMetric {
        date,
        period: Period::OneDay,
        unit: Unit::Mins,
        value: seconds_to_minutes(total_seconds),
        title: title.to_string(),
    }
}

/// Derives the wake-up-time metric from sleep-tagged entries.
///
/// Picks the entry with the latest start and reports that start as minutes
/// since midnight on the entry's own clock. Entries at the same instant keep
/// the first one listed.
pub fn wake_up_time_metric(
    entries: &[TimeEntry],
    date: NaiveDate,
) -> Result<ActivityMetric, GeneratorError> {
    let latest = entries
        .iter()
        .reduce(|best, entry| if entry.start > best.start { entry } else { best })
        .ok_or(GeneratorError::EmptyInput {
            metric: Category::WakeUpTime.metric_title(),
        })?;

    Ok(ActivityMetric {
        date,
        period: Period::OneDay,
        unit: Unit::Mins,
        value: minutes_since_midnight(latest.start.hour(), latest.start.minute()),
        title: Category::WakeUpTime.metric_title().to_string(),
    })
}

/// Derives the bed-time metric from sleep-tagged entries.
///
/// Picks the entry with the latest stop. Note the asymmetry with
/// [`wake_up_time_metric`]: both select the latest interval but by different
/// fields, so with several sleep entries in a day the two metrics can come
/// from different intervals.
pub fn bed_time_metric(
    entries: &[TimeEntry],
    date: NaiveDate,
) -> Result<ActivityMetric, GeneratorError> {
    let latest = entries
        .iter()
        .reduce(|best, entry| if entry.stop > best.stop { entry } else { best })
        .ok_or(GeneratorError::EmptyInput {
            metric: Category::BedTime.metric_title(),
        })?;

    Ok(ActivityMetric {
        date,
        period: Period::OneDay,
        unit: Unit::Mins,
        value: minutes_since_midnight(latest.stop.hour(), latest.stop.minute()),
        title: Category::BedTime.metric_title().to_string(),
    })
}

/// Computes the unrecorded-time metric over the full entry list.
///
/// The day window is `[00:00:00, 23:59:59]` of `date` in the UTC offset of
/// the first entry's start, or UTC when the list is empty. Entries are
/// clamped to the window, so cross-midnight entries count only their
/// in-window slice and an empty day reports the full 1440 minutes.
///
/// Overlapping entries are counted twice and can push the result negative;
/// that case logs a warning but still returns the literal arithmetic.
#[must_use]
pub fn unrecorded_time_metric(entries: &[TimeEntry], date: NaiveDate) -> ActivityMetric {
    let offset = entries
        .first()
        .map_or_else(|| Utc.fix(), |entry| *entry.start.offset());
    let window = DayWindow::for_date(date, offset);

    if day::has_overlap(entries, &window) {
        warn!("overlapping time entries on {date}; unrecorded time may be negative");
    }

    let recorded_minutes = seconds_to_minutes(day::recorded_seconds(entries, &window));

    ActivityMetric {
        date,
        period: Period::OneDay,
        unit: Unit::Mins,
        value: MINUTES_PER_DAY - recorded_minutes,
        title: UNRECORDED_TIME_TITLE.to_string(),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "second counts stay well within f64's exact integer range"
)]
fn seconds_to_minutes(seconds: i64) -> f64 {
    seconds as f64 / 60.0
}

fn minutes_since_midnight(hour: u32, minute: u32) -> f64 {
    f64::from(hour * 60 + minute)
}
