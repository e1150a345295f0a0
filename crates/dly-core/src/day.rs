//! Day windows and clamped-interval arithmetic.
//!
//! Unrecorded time is the complement of recorded time over one date's
//! `[00:00:00, 23:59:59]` window. Entries crossing midnight count only their
//! in-window slice, so the clamping lives here rather than in the
//! generators.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::entry::TimeEntry;

/// Minutes in the reporting day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// The `[00:00:00, 23:59:59]` window of one date in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl DayWindow {
    /// Builds the window for `date` in `offset`.
    #[must_use]
    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Self {
        let start = at_offset(date.and_time(NaiveTime::MIN), offset);
        // The window closes at 23:59:59, one second short of the next
        // midnight.
        let end = start + Duration::seconds(86_399);
        Self { start, end }
    }

    /// Window start (local midnight).
    #[must_use]
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Window end (local 23:59:59).
    #[must_use]
    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// The in-window slice of `entry`, if any.
    ///
    /// Entries wholly outside the window have no slice, as do inverted
    /// entries whose stop precedes their start.
    #[must_use]
    pub fn clamp(
        &self,
        entry: &TimeEntry,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let start = entry.start.max(self.start);
        let stop = entry.stop.min(self.end);
        (start < stop).then_some((start, stop))
    }

    /// Seconds of `entry` that fall inside the window.
    #[must_use]
    pub fn clamped_overlap_seconds(&self, entry: &TimeEntry) -> i64 {
        self.clamp(entry)
            .map_or(0, |(start, stop)| (stop - start).num_seconds())
    }
}

/// Total in-window seconds across `entries`.
///
/// Overlapping entries are summed as-is, not unioned, so overlap inflates
/// the total. Callers that care should check [`has_overlap`] first.
#[must_use]
pub fn recorded_seconds(entries: &[TimeEntry], window: &DayWindow) -> i64 {
    entries
        .iter()
        .map(|entry| window.clamped_overlap_seconds(entry))
        .sum()
}

/// Returns true when any two entries' in-window slices overlap.
///
/// Slices that merely touch at an endpoint do not overlap.
#[must_use]
pub fn has_overlap(entries: &[TimeEntry], window: &DayWindow) -> bool {
    let mut slices: Vec<_> = entries
        .iter()
        .filter_map(|entry| window.clamp(entry))
        .collect();
    slices.sort_by_key(|slice| slice.0);

    slices.windows(2).any(|pair| pair[1].0 < pair[0].1)
}

/// Maps a local wall-clock time to an instant in `offset`.
///
/// Fixed offsets have no gaps or folds, so the mapping is total.
fn at_offset(local: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}
