//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dly_core::AnalysisMode;

/// Daily activity metrics from time-tracking logs.
///
/// Reads exported time entries, resolves each entry's activity categories,
/// and derives per-day metrics such as wake-up time, per-category totals,
/// and unrecorded time.
#[derive(Debug, Parser)]
#[command(name = "dly", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Derive metrics for a day or an inclusive range of days.
    Analyze {
        /// Date to analyze (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,

        /// Last date of the range, inclusive.
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Read entries from this file instead of the logs directory.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Analysis mode: metric, summary, or table.
        #[arg(long, default_value_t = AnalysisMode::Metric)]
        mode: AnalysisMode,

        /// Output JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },

    /// List a day's entries with their resolved categories.
    Entries {
        /// Date to list (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,

        /// Read entries from this file instead of the logs directory.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },
}
