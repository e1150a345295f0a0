//! Core metric derivation logic for daily activity analysis.
//!
//! This crate contains the pure pipeline from raw time-entry records to a
//! day's metric catalog:
//! - Normalization: validating raw records into [`TimeEntry`] values
//! - Categorization: tag rules bucketing entries into categories
//! - Generation: pure functions deriving one metric each
//! - Aggregation: fixed-order dispatch producing the full metric list
//!
//! Every function takes the target date explicitly; nothing in this crate
//! reads the wall clock or performs I/O.

mod aggregate;
pub mod category;
pub mod day;
pub mod entry;
pub mod generate;
pub mod metric;

pub use aggregate::{
    AnalysisError, AnalysisMode, UnknownAnalysisMode, daily_metrics, run_analysis,
};
pub use category::{Category, UnknownCategory, categorize};
pub use entry::{
    EntryError, NormalizeOutcome, RawTimeEntry, RejectedRecord, TimeEntry, entries_on_date,
    normalize_records,
};
pub use generate::{
    GeneratorError, UNRECORDED_TIME_TITLE, bed_time_metric, sum_duration_metric,
    unrecorded_time_metric, wake_up_time_metric,
};
pub use metric::{ActivityMetric, Period, Unit};
