//! Present-weather classification and interval extraction.
//!
//! Classifies a chronological stream of present-weather code strings into
//! contiguous weather-type windows for time-series shading. Precedence is
//! expressed as an ordered rule table rather than nested branches, so the
//! ordering is data and independently testable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Weather type categories in precedence order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WxCategory {
    Snow,
    FreezingRain,
    Rain,
    FreezingFogOrDrizzle,
    SleetOrUnknown,
}

impl WxCategory {
    /// All categories in precedence order.
    pub const ALL: [WxCategory; 5] = [
        Self::Snow,
        Self::FreezingRain,
        Self::Rain,
        Self::FreezingFogOrDrizzle,
        Self::SleetOrUnknown,
    ];

    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snow => "snow",
            Self::FreezingRain => "freezing_rain",
            Self::Rain => "rain",
            Self::FreezingFogOrDrizzle => "freezing_fog_or_drizzle",
            Self::SleetOrUnknown => "sleet_or_unknown",
        }
    }
}

impl std::fmt::Display for WxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One substring-match rule in the classifier table.
struct Rule {
    category: WxCategory,
    /// Code must contain at least one of these.
    any_of: &'static [&'static str],
    /// Code must contain none of these.
    none_of: &'static [&'static str],
    /// Match `any_of` case-insensitively.
    case_insensitive: bool,
}

impl Rule {
    fn matches(&self, code: &str) -> bool {
        let hit = if self.case_insensitive {
            let lower = code.to_ascii_lowercase();
            self.any_of
                .iter()
                .any(|s| lower.contains(&s.to_ascii_lowercase()))
        } else {
            self.any_of.iter().any(|s| code.contains(s))
        };
        hit && !self.none_of.iter().any(|s| code.contains(s))
    }
}

/// The classifier table, in precedence order. "FZRA" must be tested before
/// the rain rule: it contains "ra" case-insensitively but is freezing rain.
const RULES: [Rule; 5] = [
    Rule {
        category: WxCategory::Snow,
        any_of: &["SN"],
        none_of: &[],
        case_insensitive: false,
    },
    Rule {
        category: WxCategory::FreezingRain,
        any_of: &["FZRA"],
        none_of: &[],
        case_insensitive: false,
    },
    Rule {
        category: WxCategory::Rain,
        any_of: &["ra"],
        none_of: &["FZ"],
        case_insensitive: true,
    },
    Rule {
        category: WxCategory::FreezingFogOrDrizzle,
        any_of: &["FZFG", "FZDZ"],
        none_of: &[],
        case_insensitive: false,
    },
    Rule {
        category: WxCategory::SleetOrUnknown,
        any_of: &["UP", "PL"],
        none_of: &[],
        case_insensitive: false,
    },
];

/// Classify a present-weather code string. Returns None when no rule
/// matches (e.g. haze, clear).
pub fn classify(code: &str) -> Option<WxCategory> {
    RULES
        .iter()
        .find(|rule| rule.matches(code))
        .map(|rule| rule.category)
}

/// A half-open weather-type window `[start, end)` derived from two
/// consecutive observation times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInterval {
    pub category: WxCategory,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Extract weather-type intervals from index-aligned code and timestamp
/// sequences.
///
/// Preconditions: the sequences are equal length (violations are the one
/// fatal error of this component) and the timestamps are chronological.
/// The input is never sorted here; silently reordering would mask upstream
/// data-quality bugs.
///
/// The observation at index `i` spans `[timestamps[i], timestamps[i+1])`;
/// the last index has no successor and emits nothing by rule. Missing codes
/// are skipped silently. Adjacent same-category intervals are not merged
/// (merging is a rendering-layer concern). Every category appears in the
/// output map, empty or not; within a category, input order is preserved.
pub fn extract_intervals(
    codes: &[Option<String>],
    timestamps: &[DateTime<Utc>],
) -> Result<BTreeMap<WxCategory, Vec<WeatherInterval>>> {
    if codes.len() != timestamps.len() {
        return Err(AnalysisError::MismatchedSeries {
            codes: codes.len(),
            timestamps: timestamps.len(),
        });
    }

    let mut intervals: BTreeMap<WxCategory, Vec<WeatherInterval>> =
        WxCategory::ALL.iter().map(|c| (*c, Vec::new())).collect();

    if codes.is_empty() {
        return Ok(intervals);
    }

    for i in 0..codes.len() - 1 {
        let Some(code) = &codes[i] else {
            continue;
        };
        if let Some(category) = classify(code) {
            intervals.entry(category).or_default().push(WeatherInterval {
                category,
                start: timestamps[i],
                end: timestamps[i + 1],
            });
        }
    }

    Ok(intervals)
}
