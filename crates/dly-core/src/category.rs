//! Category labels and the tag rules that assign them.
//!
//! The rule table is the single source of truth for tag-to-category mapping.
//! Rules are evaluated top to bottom and the first match wins, so an entry
//! tagged both "sleep" and "work" lands only in the sleep-derived categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical category labels for time entries.
///
/// Declaration order is the metric emission order used by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    WakeUpTime,
    BedTime,
    WorkoutTime,
    FamilyTime,
    ResearchTime,
    ReadingTime,
    AmazonTime,
    AppBuildingTime,
    FinanceTime,
    LanguageStudyTime,
    DatingTime,
    TotalWorkTime,
}

impl Category {
    /// All categories, in emission order.
    pub const ALL: [Self; 12] = [
        Self::WakeUpTime,
        Self::BedTime,
        Self::WorkoutTime,
        Self::FamilyTime,
        Self::ResearchTime,
        Self::ReadingTime,
        Self::AmazonTime,
        Self::AppBuildingTime,
        Self::FinanceTime,
        Self::LanguageStudyTime,
        Self::DatingTime,
        Self::TotalWorkTime,
    ];

    /// Label string used in serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WakeUpTime => "WakeUpTime",
            Self::BedTime => "BedTime",
            Self::WorkoutTime => "WorkoutTime",
            Self::FamilyTime => "FamilyTime",
            Self::ResearchTime => "ResearchTime",
            Self::ReadingTime => "ReadingTime",
            Self::AmazonTime => "AmazonTime",
            Self::AppBuildingTime => "AppBuildingTime",
            Self::FinanceTime => "FinanceTime",
            Self::LanguageStudyTime => "LanguageStudyTime",
            Self::DatingTime => "DatingTime",
            Self::TotalWorkTime => "TotalWorkTime",
        }
    }

    /// Title of the metric derived from this category.
    ///
    /// Titles are a schema contract for downstream consumers and must stay
    /// stable across versions.
    #[must_use]
    pub const fn metric_title(&self) -> &'static str {
        match self {
            Self::WakeUpTime => "Wake Up Time",
            Self::BedTime => "Bed Time",
            Self::WorkoutTime => "Workout Time",
            Self::FamilyTime => "Family Time",
            Self::ResearchTime => "Research Time",
            Self::ReadingTime => "Reading Time",
            Self::AmazonTime => "Amazon Time",
            Self::AppBuildingTime => "App Building Time",
            Self::FinanceTime => "Finance Time",
            Self::LanguageStudyTime => "Language Study Time",
            Self::DatingTime => "Dating Time",
            Self::TotalWorkTime => "Total Work Time",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WakeUpTime" => Ok(Self::WakeUpTime),
            "BedTime" => Ok(Self::BedTime),
            "WorkoutTime" => Ok(Self::WorkoutTime),
            "FamilyTime" => Ok(Self::FamilyTime),
            "ResearchTime" => Ok(Self::ResearchTime),
            "ReadingTime" => Ok(Self::ReadingTime),
            "AmazonTime" => Ok(Self::AmazonTime),
            "AppBuildingTime" => Ok(Self::AppBuildingTime),
            "FinanceTime" => Ok(Self::FinanceTime),
            "LanguageStudyTime" => Ok(Self::LanguageStudyTime),
            "DatingTime" => Ok(Self::DatingTime),
            "TotalWorkTime" => Ok(Self::TotalWorkTime),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category labels.
#[derive(Debug, Clone)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// One categorization rule: any of `tags` assigns all of `categories`.
struct Rule {
    tags: &'static [&'static str],
    categories: &'static [Category],
}

/// Priority-ordered rule table. The first matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        tags: &["sleep"],
        categories: &[Category::WakeUpTime, Category::BedTime],
    },
    Rule {
        tags: &["cardio", "workout"],
        categories: &[Category::WorkoutTime],
    },
    Rule {
        tags: &[
            "brother",
            "parent",
            "mom",
            "mom_call",
            "parent_call",
            "dad_call",
        ],
        categories: &[Category::FamilyTime],
    },
    Rule {
        tags: &["research"],
        categories: &[Category::ResearchTime, Category::TotalWorkTime],
    },
    Rule {
        tags: &["daily_reading"],
        categories: &[Category::ReadingTime, Category::TotalWorkTime],
    },
    Rule {
        tags: &["work"],
        categories: &[Category::AmazonTime, Category::TotalWorkTime],
    },
    Rule {
        tags: &["app"],
        categories: &[Category::AppBuildingTime, Category::TotalWorkTime],
    },
    Rule {
        tags: &["daily_accounting", "weekly_accounting", "finance"],
        categories: &[Category::FinanceTime],
    },
    Rule {
        tags: &["language"],
        categories: &[Category::LanguageStudyTime],
    },
    Rule {
        tags: &["zexin"],
        categories: &[Category::DatingTime],
    },
];

/// Returns the categories a tag set belongs to.
///
/// Matching is case-insensitive and stops at the first rule with any tag in
/// the set. Tags matching no rule leave the entry uncategorized; such an
/// entry still counts toward unrecorded time.
#[must_use]
pub fn categorize(tags: &[String]) -> &'static [Category] {
    for rule in RULES {
        if rule
            .tags
            .iter()
            .any(|rule_tag| tags.iter().any(|tag| tag.eq_ignore_ascii_case(rule_tag)))
        {
            return rule.categories;
        }
    }
    &[]
}
