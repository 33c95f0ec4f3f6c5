use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod sheet;
pub mod time;

// Re-export for convenience
pub use sheet::{SheetError, append_paragraphs, read_paragraphs, write_sentiments};
pub use time::utc_timestamp;

/// Default values written for rows whose completion response could not be
/// parsed. Injecting these keeps row counts intact at the cost of synthetic
/// neutral/no-change entries indistinguishable from genuine ones.
pub const DEFAULT_SENTIMENT: &str = "Neutral";
pub const DEFAULT_EXPLANATION: &str = "Analysis of performance";
pub const DEFAULT_CHANGE: &str = "+0%";

/// One of the five fixed sustainability-aim categories tracked per report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AimCategory {
    Aim1,
    Aim2,
    Aim3,
    Aim4,
    Aim5,
}

impl AimCategory {
    pub const ALL: [AimCategory; 5] = [
        AimCategory::Aim1,
        AimCategory::Aim2,
        AimCategory::Aim3,
        AimCategory::Aim4,
        AimCategory::Aim5,
    ];

    /// Zero-based position within [`AimCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AimCategory::Aim1 => 0,
            AimCategory::Aim2 => 1,
            AimCategory::Aim3 => 2,
            AimCategory::Aim4 => 3,
            AimCategory::Aim5 => 4,
        }
    }

    /// The 1-based aim number as printed in reports.
    pub fn number(&self) -> u32 {
        self.index() as u32 + 1
    }

    /// Canonical spreadsheet label, e.g. "Aim 3".
    pub fn label(&self) -> &'static str {
        match self {
            AimCategory::Aim1 => "Aim 1",
            AimCategory::Aim2 => "Aim 2",
            AimCategory::Aim3 => "Aim 3",
            AimCategory::Aim4 => "Aim 4",
            AimCategory::Aim5 => "Aim 5",
        }
    }
}

impl fmt::Display for AimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown aim label: {0}")]
pub struct ParseAimError(String);

impl FromStr for AimCategory {
    type Err = ParseAimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "aim1" => Ok(AimCategory::Aim1),
            "aim2" => Ok(AimCategory::Aim2),
            "aim3" => Ok(AimCategory::Aim3),
            "aim4" => Ok(AimCategory::Aim4),
            "aim5" => Ok(AimCategory::Aim5),
            _ => Err(ParseAimError(s.to_string())),
        }
    }
}

/// A paragraph extracted from one report, keyed by aim and year.
///
/// Created once per PDF/year during extraction and appended to a persistent
/// spreadsheet; never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    #[serde(rename = "Aim")]
    pub aim: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Content")]
    pub content: String,
}

impl ParagraphRecord {
    pub fn new(aim: AimCategory, year: i32, content: String) -> Self {
        Self {
            aim: aim.label().to_string(),
            year,
            content,
        }
    }
}

/// A [`ParagraphRecord`] augmented with the five derived analysis columns.
///
/// Invariant: every derived field is populated; rows without a parseable
/// response get [`DEFAULT_SENTIMENT`] / [`DEFAULT_EXPLANATION`] /
/// [`DEFAULT_CHANGE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    #[serde(rename = "Aim")]
    pub aim: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Explanation")]
    pub explanation: String,
    #[serde(rename = "vs previous year")]
    pub prev_year_change: String,
    #[serde(rename = "vs 2019")]
    pub baseline_change: String,
    #[serde(rename = "Analysis_Date")]
    pub analysis_date: String,
}
