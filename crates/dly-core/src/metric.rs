//! Activity metric value types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting granularity of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1hr")]
    OneHour,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
}

impl Period {
    /// String representation used in serialized output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1hr",
            Self::OneDay => "1day",
            Self::OneWeek => "1week",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Int,
    Mins,
    Hrs,
    Days,
}

impl Unit {
    /// String representation used in serialized output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Mins => "mins",
            Self::Hrs => "hrs",
            Self::Days => "days",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One aggregate numeric fact about a day's activity.
///
/// The `title` doubles as the stable identifier downstream consumers key on
/// (CSV columns, response fields), so title strings must not change across
/// versions. Every generator currently emits `period = 1day` and
/// `unit = mins`; the type permits other combinations but nothing produces
/// them yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetric {
    /// Calendar date the metric pertains to.
    pub date: NaiveDate,
    pub period: Period,
    pub unit: Unit,
    /// Magnitude, in `unit`.
    pub value: f64,
    /// Human-readable name and stable identifier.
    pub title: String,
}
