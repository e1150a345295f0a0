//! Time entries and wire-format normalization.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for raw time-entry records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The record is missing required fields.
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
}

/// One contiguous tracked time interval.
///
/// `duration` is carried from the source record and used directly by
/// sum-based metrics; it is not recomputed from `start`/`stop`. Nothing
/// enforces `start <= stop`; inverted intervals simply contribute no
/// in-window time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Lowercase tags driving categorization.
    pub tags: Vec<String>,
    /// Free text, not used in derivation.
    pub description: String,
    /// When the interval began, in the source's own UTC offset.
    pub start: DateTime<FixedOffset>,
    /// When the interval ended.
    pub stop: DateTime<FixedOffset>,
    /// Interval length in seconds, as reported by the source.
    pub duration: i64,
}

/// A time-entry record as it arrives from a log file or export.
///
/// Every field is optional so that one malformed record can be reported and
/// skipped without failing the surrounding batch. Unknown fields in the
/// source are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTimeEntry {
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub stop: Option<DateTime<FixedOffset>>,
    pub duration: Option<i64>,
}

/// A record rejected during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position of the record in the input batch.
    pub index: usize,
    /// The record's description, when it carried one.
    pub description: Option<String>,
    pub error: EntryError,
}

/// Result of normalizing a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub entries: Vec<TimeEntry>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validates raw records into [`TimeEntry`] values.
///
/// A record missing any required field is reported in `rejected` with every
/// missing field named; the remaining records still normalize. Tags are
/// lowercased here so downstream rule matching sees canonical values.
#[must_use]
pub fn normalize_records(records: Vec<RawTimeEntry>) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for (index, record) in records.into_iter().enumerate() {
        match (
            record.tags,
            record.description,
            record.start,
            record.stop,
            record.duration,
        ) {
            (Some(tags), Some(description), Some(start), Some(stop), Some(duration)) => {
                outcome.entries.push(TimeEntry {
                    tags: tags.into_iter().map(|tag| tag.to_lowercase()).collect(),
                    description,
                    start,
                    stop,
                    duration,
                });
            }
            (tags, description, start, stop, duration) => {
                let mut fields = Vec::new();
                if tags.is_none() {
                    fields.push("tags");
                }
                if description.is_none() {
                    fields.push("description");
                }
                if start.is_none() {
                    fields.push("start");
                }
                if stop.is_none() {
                    fields.push("stop");
                }
                if duration.is_none() {
                    fields.push("duration");
                }
                outcome.rejected.push(RejectedRecord {
                    index,
                    description,
                    error: EntryError::MissingFields { fields },
                });
            }
        }
    }

    outcome
}

/// Filters entries to those belonging to `date`.
///
/// An entry belongs to a date when its start or its stop falls on that
/// calendar day in the entry's own UTC offset, so cross-midnight entries
/// appear on both days they touch. Input order is preserved.
#[must_use]
pub fn entries_on_date(entries: &[TimeEntry], date: NaiveDate) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|entry| entry.start.date_naive() == date || entry.stop.date_naive() == date)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        tags: &[&str],
        description: &str,
        start: &str,
        stop: &str,
        duration: i64,
    ) -> RawTimeEntry {
        RawTimeEntry {
            tags: Some(tags.iter().map(ToString::to_string).collect()),
            description: Some(description.to_string()),
            start: Some(at(start)),
            stop: Some(at(stop)),
            duration: Some(duration),
        }
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("valid test timestamp")
    }

    #[test]
    fn normalizes_complete_records() {
        let outcome = normalize_records(vec![raw(
            &["workout"],
            "morning run",
            "2025-03-10T08:00:00+00:00",
            "2025-03-10T08:30:00+00:00",
            1800,
        )]);

        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.entries.len(), 1);
        let entry = &outcome.entries[0];
        assert_eq!(entry.tags, vec!["workout"]);
        assert_eq!(entry.description, "morning run");
        assert_eq!(entry.duration, 1800);
    }

    #[test]
    fn lowercases_tags() {
        let outcome = normalize_records(vec![raw(
            &["Sleep", "NIGHT"],
            "overnight",
            "2025-03-09T23:00:00+00:00",
            "2025-03-10T07:00:00+00:00",
            28_800,
        )]);

        assert_eq!(outcome.entries[0].tags, vec!["sleep", "night"]);
    }

    #[test]
    fn rejects_record_and_names_every_missing_field() {
        let record = RawTimeEntry {
            description: Some("broken".to_string()),
            duration: Some(600),
            ..RawTimeEntry::default()
        };

        let outcome = normalize_records(vec![record]);

        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        let rejected = &outcome.rejected[0];
        assert_eq!(rejected.index, 0);
        assert_eq!(rejected.description.as_deref(), Some("broken"));
        assert_eq!(
            rejected.error,
            EntryError::MissingFields {
                fields: vec!["tags", "start", "stop"],
            }
        );
        assert_eq!(
            rejected.error.to_string(),
            "missing required fields: tags, start, stop"
        );
    }

    #[test]
    fn bad_record_does_not_sink_siblings() {
        let outcome = normalize_records(vec![
            raw(
                &["research"],
                "paper",
                "2025-03-10T09:00:00+00:00",
                "2025-03-10T10:00:00+00:00",
                3600,
            ),
            RawTimeEntry::default(),
            raw(
                &["workout"],
                "run",
                "2025-03-10T18:00:00+00:00",
                "2025-03-10T18:30:00+00:00",
                1800,
            ),
        ]);

        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 1);
        assert_eq!(
            outcome.rejected[0].error,
            EntryError::MissingFields {
                fields: vec!["tags", "description", "start", "stop", "duration"],
            }
        );
    }

    #[test]
    fn raw_records_ignore_unknown_fields() {
        let json = r#"{
            "id": 12345,
            "tags": ["sleep"],
            "description": "overnight",
            "start": "2025-03-09T23:30:00+02:00",
            "stop": "2025-03-10T07:00:00+02:00",
            "duration": 27000,
            "project": "life"
        }"#;

        let record: RawTimeEntry = serde_json::from_str(json).expect("should parse");
        let outcome = normalize_records(vec![record]);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].start.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn entries_on_date_matches_start_or_stop() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let outcome = normalize_records(vec![
            // Starts the day before, stops on the date
            raw(
                &["sleep"],
                "overnight",
                "2025-03-09T23:00:00+00:00",
                "2025-03-10T07:00:00+00:00",
                28_800,
            ),
            // Fully on the date
            raw(
                &["work"],
                "standup",
                "2025-03-10T09:00:00+00:00",
                "2025-03-10T09:15:00+00:00",
                900,
            ),
            // Starts on the date, stops the day after
            raw(
                &["sleep"],
                "tonight",
                "2025-03-10T23:30:00+00:00",
                "2025-03-11T07:00:00+00:00",
                27_000,
            ),
            // A different day entirely
            raw(
                &["work"],
                "old",
                "2025-03-08T09:00:00+00:00",
                "2025-03-08T10:00:00+00:00",
                3600,
            ),
        ]);

        let selected = entries_on_date(&outcome.entries, date);
        let descriptions: Vec<&str> = selected
            .iter()
            .map(|entry| entry.description.as_str())
            .collect();
        assert_eq!(descriptions, ["overnight", "standup", "tonight"]);
    }

    #[test]
    fn entries_on_date_uses_the_entry_offset() {
        // 23:30 on March 10 in +02:00 is 21:30 UTC; the entry belongs to
        // March 10 as its own clock saw it.
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let outcome = normalize_records(vec![raw(
            &["language"],
            "flashcards",
            "2025-03-10T23:30:00+02:00",
            "2025-03-10T23:50:00+02:00",
            1200,
        )]);

        assert_eq!(entries_on_date(&outcome.entries, date).len(), 1);
        let next_day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(entries_on_date(&outcome.entries, next_day).is_empty());
    }
}
