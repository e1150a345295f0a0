//! Entries command for inspecting a day's normalized entries.
//!
//! This module implements `dly entries`, the per-entry view of what the
//! analyzer will see for a date: times, duration, tags, and the
//! categories each entry resolved to.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use dly_core::{RejectedRecord, TimeEntry, categorize, entries_on_date};
use serde::Serialize;

use super::analyze::{JsonRejectedRecord, day_file, json_rejected, load_entries};
use crate::Config;

/// One entry prepared for display.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub description: String,
    pub tags: Vec<String>,
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
    pub duration: i64,
    pub categories: Vec<String>,
}

/// Prepares a day's entries for display, resolving categories.
pub fn rows_for_date(entries: &[TimeEntry], date: NaiveDate) -> Vec<EntryRow> {
    entries_on_date(entries, date)
        .into_iter()
        .map(|entry| {
            let categories = categorize(&entry.tags)
                .iter()
                .map(ToString::to_string)
                .collect();
            EntryRow {
                description: entry.description,
                tags: entry.tags,
                start: entry.start,
                stop: entry.stop,
                duration: entry.duration,
                categories,
            }
        })
        .collect()
}

// ========== Duration Formatting ==========

/// Formats seconds as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

// ========== Human-Readable Output ==========

/// Formats a day's entries for human-readable output.
pub fn format_entries(rows: &[EntryRow], date: NaiveDate, rejected_count: usize) -> String {
    let mut output = String::new();

    writeln!(output, "ENTRIES: {}", date.format("%A, %b %-d, %Y")).unwrap();
    writeln!(output).unwrap();

    if rows.is_empty() {
        writeln!(output, "No entries recorded on {date}.").unwrap();
        if rejected_count > 0 {
            writeln!(output, "Records rejected: {rejected_count}").unwrap();
        }
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'dly analyze --date {date}' for the unrecorded-time metric anyway."
        )
        .unwrap();
        return output;
    }

    // Header
    writeln!(
        output,
        "{:<11}  {:<11}  {:>8}  {:<20}  Categories",
        "Start", "Stop", "Duration", "Tags"
    )
    .unwrap();
    writeln!(
        output,
        "───────────  ───────────  ────────  ────────────────────  ──────────────────"
    )
    .unwrap();

    // Rows
    for row in rows {
        let tags = row.tags.join(", ");
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let tags_display = if tags.chars().count() > 20 {
            format!("{}...", tags.chars().take(17).collect::<String>())
        } else {
            tags
        };

        writeln!(
            output,
            "{:<11}  {:<11}  {:>8}  {:<20}  {}",
            row.start.format("%m-%d %H:%M"),
            row.stop.format("%m-%d %H:%M"),
            format_duration(row.duration),
            tags_display,
            row.categories.join(", ")
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Entries: {}", rows.len()).unwrap();
    if rejected_count > 0 {
        writeln!(output, "Records rejected: {rejected_count}").unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonEntries {
    pub generated_at: String,
    pub timezone: String,
    pub date: NaiveDate,
    pub entries: Vec<EntryRow>,
    pub rejected_records: Vec<JsonRejectedRecord>,
}

/// Formats a day's entries as JSON.
pub fn format_entries_json(
    rows: &[EntryRow],
    rejected: &[RejectedRecord],
    date: NaiveDate,
    generated_at: DateTime<Utc>,
    timezone: &str,
) -> Result<String> {
    let envelope = JsonEntries {
        generated_at: generated_at.to_rfc3339(),
        timezone: timezone.to_string(),
        date,
        entries: rows.to_vec(),
        rejected_records: json_rejected(rejected),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

// ========== Public Interface ==========

/// Runs the entries command.
pub fn run(config: &Config, date: NaiveDate, input: Option<&Path>, json: bool) -> Result<()> {
    let path = match input {
        Some(path) => path.to_path_buf(),
        None => day_file(&config.logs_dir, date),
    };
    let outcome = load_entries(&path)?;
    let rows = rows_for_date(&outcome.entries, date);

    if json {
        let generated_at = Utc::now();
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        let output = format_entries_json(&rows, &outcome.rejected, date, generated_at, &timezone)?;
        println!("{output}");
    } else {
        let output = format_entries(&rows, date, outcome.rejected.len());
        print!("{output}");
    }

    Ok(())
}
