//! Metric dispatch across a day's entries.
//!
//! [`daily_metrics`] is the single entry point producing the full ordered
//! metric list for a date. Metrics are emitted in category declaration
//! order, then unrecorded time, then total work time; input order never
//! affects the output order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::category::{Category, categorize};
use crate::entry::TimeEntry;
use crate::generate::{
    GeneratorError, bed_time_metric, sum_duration_metric, unrecorded_time_metric,
    wake_up_time_metric,
};
use crate::metric::ActivityMetric;

/// The shape of analysis requested for a day's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    /// The metric catalog. The only implemented mode.
    Metric,
    /// Prose summary of the day. Not implemented.
    Summary,
    /// Tabular per-entry breakdown. Not implemented.
    Table,
}

impl AnalysisMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Summary => "summary",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = UnknownAnalysisMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "summary" => Ok(Self::Summary),
            "table" => Ok(Self::Table),
            _ => Err(UnknownAnalysisMode(s.to_string())),
        }
    }
}

/// Error type for unknown analysis mode strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown analysis mode: {0} (expected metric, summary, or table)")]
pub struct UnknownAnalysisMode(String);

/// Errors from running an analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// The requested mode exists in the catalog but has no implementation.
    /// Distinct from an analysis that ran and produced nothing.
    #[error("{mode} analysis is not implemented")]
    Unimplemented { mode: AnalysisMode },
}

/// Produces the full ordered metric list for one date.
///
/// Entries are bucketed by category, with an entry carrying two labels
/// landing in two buckets. Each non-empty bucket then feeds its generator:
/// wake/bed for the sleep-derived buckets, duration sums for the rest.
/// Unrecorded time always runs, over the full entry list. Total work time
/// runs over the entries whose categorization includes
/// [`Category::TotalWorkTime`] and is emitted only when that bucket is
/// non-empty.
pub fn daily_metrics(
    entries: &[TimeEntry],
    date: NaiveDate,
) -> Result<Vec<ActivityMetric>, GeneratorError> {
    let mut buckets: HashMap<Category, Vec<TimeEntry>> = HashMap::new();
    for entry in entries {
        for category in categorize(&entry.tags) {
            buckets.entry(*category).or_default().push(entry.clone());
        }
    }

    let mut metrics = Vec::new();
    for category in Category::ALL {
        // Total work closes the list, after unrecorded time.
        if category == Category::TotalWorkTime {
            continue;
        }
        let Some(bucket) = buckets.get(&category) else {
            continue;
        };
        let metric = match category {
            Category::WakeUpTime => wake_up_time_metric(bucket, date)?,
            Category::BedTime => bed_time_metric(bucket, date)?,
            _ => sum_duration_metric(bucket, date, category.metric_title()),
        };
        metrics.push(metric);
    }

    metrics.push(unrecorded_time_metric(entries, date));

    if let Some(bucket) = buckets.get(&Category::TotalWorkTime) {
        metrics.push(sum_duration_metric(
            bucket,
            date,
            Category::TotalWorkTime.metric_title(),
        ));
    }

    Ok(metrics)
}

/// Runs an analysis of `entries` in the requested mode.
///
/// Only [`AnalysisMode::Metric`] is implemented; summary and table requests
/// fail with [`AnalysisError::Unimplemented`] rather than returning an
/// empty result.
pub fn run_analysis(
    entries: &[TimeEntry],
    date: NaiveDate,
    mode: AnalysisMode,
) -> Result<Vec<ActivityMetric>, AnalysisError> {
    match mode {
        AnalysisMode::Metric => Ok(daily_metrics(entries, date)?),
        AnalysisMode::Summary | AnalysisMode::Table => Err(AnalysisError::Unimplemented { mode }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn entry(tags: &[&str], start: &str, stop: &str, duration: i64) -> TimeEntry {
        TimeEntry {
            tags: tags.iter().map(ToString::to_string).collect(),
            description: "test entry".to_string(),
            start: at(start),
            stop: at(stop),
            duration,
        }
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("valid test timestamp")
    }

    fn march_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid test date")
    }

    fn titles(metrics: &[ActivityMetric]) -> Vec<&str> {
        metrics.iter().map(|metric| metric.title.as_str()).collect()
    }

    fn value_of<'a>(metrics: &'a [ActivityMetric], title: &str) -> &'a ActivityMetric {
        metrics
            .iter()
            .find(|metric| metric.title == title)
            .unwrap_or_else(|| panic!("no metric titled {title}"))
    }

    #[test]
    fn workout_and_research_day() {
        let entries = vec![
            entry(
                &["workout"],
                "2025-03-10T08:00:00+00:00",
                "2025-03-10T08:30:00+00:00",
                1800,
            ),
            entry(
                &["research"],
                "2025-03-10T09:00:00+00:00",
                "2025-03-10T10:00:00+00:00",
                3600,
            ),
        ];

        let metrics = daily_metrics(&entries, march_10()).unwrap();

        assert_eq!(
            titles(&metrics),
            [
                "Workout Time",
                "Research Time",
                "Unrecorded Time",
                "Total Work Time",
            ]
        );
        assert!((value_of(&metrics, "Workout Time").value - 30.0).abs() < f64::EPSILON);
        assert!((value_of(&metrics, "Research Time").value - 60.0).abs() < f64::EPSILON);
        // Workout occupies wall-clock time but does not count toward work.
        assert!((value_of(&metrics, "Total Work Time").value - 60.0).abs() < f64::EPSILON);
        assert!((value_of(&metrics, "Unrecorded Time").value - 1350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn emission_order_covers_the_whole_catalog() {
        let entries = vec![
            entry(
                &["zexin"],
                "2025-03-10T18:00:00+00:00",
                "2025-03-10T20:00:00+00:00",
                7200,
            ),
            entry(
                &["language"],
                "2025-03-10T16:00:00+00:00",
                "2025-03-10T16:30:00+00:00",
                1800,
            ),
            entry(
                &["finance"],
                "2025-03-10T15:00:00+00:00",
                "2025-03-10T15:10:00+00:00",
                600,
            ),
            entry(
                &["app"],
                "2025-03-10T14:00:00+00:00",
                "2025-03-10T15:00:00+00:00",
                3600,
            ),
            entry(
                &["work"],
                "2025-03-10T12:00:00+00:00",
                "2025-03-10T14:00:00+00:00",
                7200,
            ),
            entry(
                &["daily_reading"],
                "2025-03-10T11:00:00+00:00",
                "2025-03-10T11:30:00+00:00",
                1800,
            ),
            entry(
                &["research"],
                "2025-03-10T10:00:00+00:00",
                "2025-03-10T11:00:00+00:00",
                3600,
            ),
            entry(
                &["mom"],
                "2025-03-10T09:00:00+00:00",
                "2025-03-10T09:20:00+00:00",
                1200,
            ),
            entry(
                &["cardio"],
                "2025-03-10T08:00:00+00:00",
                "2025-03-10T08:30:00+00:00",
                1800,
            ),
            entry(
                &["sleep"],
                "2025-03-10T00:30:00+00:00",
                "2025-03-10T07:30:00+00:00",
                25_200,
            ),
        ];

        let metrics = daily_metrics(&entries, march_10()).unwrap();

        // Input above is deliberately reversed; output order must not move.
        assert_eq!(
            titles(&metrics),
            [
                "Wake Up Time",
                "Bed Time",
                "Workout Time",
                "Family Time",
                "Research Time",
                "Reading Time",
                "Amazon Time",
                "App Building Time",
                "Finance Time",
                "Language Study Time",
                "Dating Time",
                "Unrecorded Time",
                "Total Work Time",
            ]
        );

        assert!((value_of(&metrics, "Wake Up Time").value - 30.0).abs() < f64::EPSILON);
        assert!((value_of(&metrics, "Bed Time").value - 450.0).abs() < f64::EPSILON);
        // research + reading + work + app
        assert!((value_of(&metrics, "Total Work Time").value - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_entry_can_feed_two_metrics() {
        let entries = vec![entry(
            &["research"],
            "2025-03-10T09:00:00+00:00",
            "2025-03-10T10:00:00+00:00",
            3600,
        )];

        let metrics = daily_metrics(&entries, march_10()).unwrap();

        assert_eq!(
            titles(&metrics),
            ["Research Time", "Unrecorded Time", "Total Work Time"]
        );
        let research = value_of(&metrics, "Research Time").value;
        let total_work = value_of(&metrics, "Total Work Time").value;
        assert!((research - total_work).abs() < f64::EPSILON);
    }

    #[test]
    fn uncategorized_entries_still_occupy_the_day() {
        let entries = vec![entry(
            &["groceries"],
            "2025-03-10T10:00:00+00:00",
            "2025-03-10T12:00:00+00:00",
            7200,
        )];

        let metrics = daily_metrics(&entries, march_10()).unwrap();

        // No category matched, so no sum metrics and no total work.
        assert_eq!(titles(&metrics), ["Unrecorded Time"]);
        assert!((metrics[0].value - 1320.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_day_yields_only_unrecorded_time() {
        let metrics = daily_metrics(&[], march_10()).unwrap();

        assert_eq!(titles(&metrics), ["Unrecorded Time"]);
        assert!((metrics[0].value - 1440.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metric_mode_runs_the_catalog() {
        let entries = vec![entry(
            &["workout"],
            "2025-03-10T08:00:00+00:00",
            "2025-03-10T08:30:00+00:00",
            1800,
        )];

        let metrics = run_analysis(&entries, march_10(), AnalysisMode::Metric).unwrap();
        assert_eq!(titles(&metrics), ["Workout Time", "Unrecorded Time"]);
    }

    #[test]
    fn unimplemented_modes_fail_instead_of_returning_empty() {
        for mode in [AnalysisMode::Summary, AnalysisMode::Table] {
            let result = run_analysis(&[], march_10(), mode);
            assert_eq!(
                result.unwrap_err(),
                AnalysisError::Unimplemented { mode },
                "{mode} must fail, not produce an empty result"
            );
        }

        assert_eq!(
            AnalysisError::Unimplemented {
                mode: AnalysisMode::Summary,
            }
            .to_string(),
            "summary analysis is not implemented"
        );
    }

    #[test]
    fn analysis_mode_parses_and_displays() {
        for mode in [AnalysisMode::Metric, AnalysisMode::Summary, AnalysisMode::Table] {
            let parsed: AnalysisMode = mode.as_str().parse().expect("should parse");
            assert_eq!(parsed, mode);
        }

        let result: Result<AnalysisMode, _> = "chart".parse();
        assert_eq!(
            result.unwrap_err().to_string(),
            "unknown analysis mode: chart (expected metric, summary, or table)"
        );
    }
}
