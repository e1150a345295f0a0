//! Analyze command for deriving daily activity metrics.
//!
//! This module implements `dly analyze` over one date or an inclusive
//! `--date`/`--to` range, with human-readable and JSON output.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use dly_core::{
    ActivityMetric, AnalysisError, AnalysisMode, NormalizeOutcome, RawTimeEntry, RejectedRecord,
    entries_on_date, normalize_records, run_analysis,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::Config;

/// Derived metrics for one analyzed day.
#[derive(Debug)]
pub struct DayReport {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub metrics: Vec<ActivityMetric>,
    pub rejected: Vec<RejectedRecord>,
}

// ========== Entry Loading ==========

/// Returns the log file for a date: `<logs_dir>/<date>.json`.
pub fn day_file(logs_dir: &Path, date: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{date}.json"))
}

/// Reads a JSON export file and normalizes its records.
///
/// Rejected records are logged and dropped; the valid remainder proceeds.
pub fn load_entries(path: &Path) -> Result<NormalizeOutcome> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<RawTimeEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let outcome = normalize_records(records);
    for rejected in &outcome.rejected {
        tracing::warn!(
            index = rejected.index,
            description = rejected.description.as_deref().unwrap_or(""),
            error = %rejected.error,
            "skipping invalid record"
        );
    }
    Ok(outcome)
}

// ========== Analysis ==========

/// Runs the engine for one date over an already-normalized entry set.
fn day_report(
    outcome: &NormalizeOutcome,
    date: NaiveDate,
    mode: AnalysisMode,
) -> Result<DayReport, AnalysisError> {
    let entries = entries_on_date(&outcome.entries, date);
    let metrics = run_analysis(&entries, date, mode)?;
    Ok(DayReport {
        date,
        entry_count: entries.len(),
        metrics,
        rejected: outcome.rejected.clone(),
    })
}

/// Dates from `from` through `to`, inclusive.
fn dates_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|date| *date <= to).collect()
}

/// Analyzes each day of the range from its own log file.
///
/// Days whose file cannot be read are skipped with a warning so one
/// missing export does not abort the rest of the range.
pub fn analyze_logs(
    logs_dir: &Path,
    from: NaiveDate,
    to: NaiveDate,
    mode: AnalysisMode,
) -> Result<Vec<DayReport>> {
    let reports = dates_between(from, to)
        .into_par_iter()
        .filter_map(|date| {
            let path = day_file(logs_dir, date);
            match load_entries(&path) {
                Ok(outcome) => Some(day_report(&outcome, date, mode)),
                Err(e) => {
                    tracing::warn!(%date, error = %e, "skipping day");
                    None
                }
            }
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;
    Ok(reports)
}

/// Analyzes each day of the range against one shared entry set.
pub fn analyze_input(
    outcome: &NormalizeOutcome,
    from: NaiveDate,
    to: NaiveDate,
    mode: AnalysisMode,
) -> Result<Vec<DayReport>, AnalysisError> {
    dates_between(from, to)
        .into_par_iter()
        .map(|date| day_report(outcome, date, mode))
        .collect()
}

// ========== Human-Readable Output ==========

/// Formats one day's metric table.
fn format_day(output: &mut String, report: &DayReport) {
    writeln!(
        output,
        "DAILY METRICS: {}",
        report.date.format("%A, %b %-d, %Y")
    )
    .unwrap();
    writeln!(output).unwrap();

    writeln!(output, "{:<22}  {:>8}  Unit", "Metric", "Value").unwrap();
    writeln!(output, "──────────────────────  ────────  ────").unwrap();
    for metric in &report.metrics {
        writeln!(
            output,
            "{:<22}  {:>8.1}  {}",
            metric.title, metric.value, metric.unit
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Entries analyzed: {}", report.entry_count).unwrap();
    if !report.rejected.is_empty() {
        writeln!(output, "Records rejected: {}", report.rejected.len()).unwrap();
    }
}

/// Formats the human-readable output for a run.
pub fn format_reports(reports: &[DayReport]) -> String {
    let mut output = String::new();

    if reports.is_empty() {
        writeln!(output, "No log files could be read for the requested dates.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Place per-day exports at <logs_dir>/YYYY-MM-DD.json or pass --input <file>."
        )
        .unwrap();
        return output;
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        format_day(&mut output, report);
    }

    output
}

// ========== JSON Output ==========

/// A rejected record in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonRejectedRecord {
    pub index: usize,
    pub description: Option<String>,
    pub error: String,
}

/// Per-day payload shared by both JSON envelopes.
#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub metrics: Vec<ActivityMetric>,
    pub rejected_records: Vec<JsonRejectedRecord>,
}

/// JSON envelope for a single-day run.
#[derive(Debug, Serialize)]
pub struct JsonDayReport {
    pub generated_at: String,
    pub timezone: String,
    pub date: NaiveDate,
    pub entry_count: usize,
    pub metrics: Vec<ActivityMetric>,
    pub rejected_records: Vec<JsonRejectedRecord>,
}

/// JSON envelope for a range run.
#[derive(Debug, Serialize)]
pub struct JsonRangeReport {
    pub generated_at: String,
    pub timezone: String,
    pub days: Vec<JsonDay>,
}

/// Converts rejected records to their JSON form.
pub fn json_rejected(rejected: &[RejectedRecord]) -> Vec<JsonRejectedRecord> {
    rejected
        .iter()
        .map(|record| JsonRejectedRecord {
            index: record.index,
            description: record.description.clone(),
            error: record.error.to_string(),
        })
        .collect()
}

fn json_day(report: &DayReport) -> JsonDay {
    JsonDay {
        date: report.date,
        entry_count: report.entry_count,
        metrics: report.metrics.clone(),
        rejected_records: json_rejected(&report.rejected),
    }
}

/// Formats a single-day run as JSON.
pub fn format_day_json(
    report: &DayReport,
    generated_at: DateTime<Utc>,
    timezone: &str,
) -> Result<String> {
    let day = json_day(report);
    let envelope = JsonDayReport {
        generated_at: generated_at.to_rfc3339(),
        timezone: timezone.to_string(),
        date: day.date,
        entry_count: day.entry_count,
        metrics: day.metrics,
        rejected_records: day.rejected_records,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Formats a range run as JSON.
pub fn format_range_json(
    reports: &[DayReport],
    generated_at: DateTime<Utc>,
    timezone: &str,
) -> Result<String> {
    let envelope = JsonRangeReport {
        generated_at: generated_at.to_rfc3339(),
        timezone: timezone.to_string(),
        days: reports.iter().map(json_day).collect(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

// ========== Public Interface ==========

/// Runs the analyze command.
pub fn run(
    config: &Config,
    date: NaiveDate,
    to: Option<NaiveDate>,
    input: Option<&Path>,
    mode: AnalysisMode,
    json: bool,
) -> Result<()> {
    let generated_at = Utc::now();
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    match to {
        None => {
            let path = match input {
                Some(path) => path.to_path_buf(),
                None => day_file(&config.logs_dir, date),
            };
            let outcome = load_entries(&path)?;
            let report = day_report(&outcome, date, mode)?;

            if json {
                println!("{}", format_day_json(&report, generated_at, &timezone)?);
            } else {
                print!("{}", format_reports(&[report]));
            }
        }
        Some(last) => {
            if last < date {
                bail!("--to {last} is before --date {date}");
            }
            let mut reports = match input {
                Some(path) => {
                    let outcome = load_entries(path)?;
                    analyze_input(&outcome, date, last, mode)?
                }
                None => analyze_logs(&config.logs_dir, date, last, mode)?,
            };
            reports.sort_by_key(|report| report.date);

            if json {
                println!("{}", format_range_json(&reports, generated_at, &timezone)?);
            } else {
                print!("{}", format_reports(&reports));
            }
        }
    }

    Ok(())
}
