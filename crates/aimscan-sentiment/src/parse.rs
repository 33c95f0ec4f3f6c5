//! Parsing of free-text completion responses into per-row fields.
//!
//! Each field has an ordered list of patterns tried in sequence; the first
//! match wins and a documented default is substituted when none match, so
//! a garbled response degrades to neutral/no-change values instead of
//! dropping the row.

use once_cell::sync::Lazy;
use regex::Regex;

use aimscan_core::{DEFAULT_CHANGE, DEFAULT_EXPLANATION, DEFAULT_SENTIMENT};

/// Parsed per-row analysis fields, in response order. The four vectors
/// always have equal length (one entry per `Sentence N:` section found).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAnalysis {
    pub sentiments: Vec<String>,
    pub explanations: Vec<String>,
    pub prev_year_changes: Vec<String>,
    pub baseline_changes: Vec<String>,
}

impl ParsedAnalysis {
    pub fn len(&self) -> usize {
        self.sentiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentiments.is_empty()
    }
}

static SENTIMENT_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)Sentiment:\s*(\w+)", r"(?i)sentiment is\s*(\w+)"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static PREV_YEAR_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Previous year change.*?([+-]?\d+\.?\d*%)",
        r"(?i)compared to (?:previous year|last year).*?([+-]?\d+\.?\d*%)",
        r"(?i)(increased|decreased) by (\d+\.?\d*)%.*?from.*?previous",
        r"(?i)change of ([+-]?\d+\.?\d*%)",
        r"(?i)([+-]?\d+\.?\d*%).*?compared to.*?previous",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static BASELINE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Baseline change.*?([+-]?\d+\.?\d*%)",
        r"(?i)compared to 2019.*?([+-]?\d+\.?\d*%)",
        r"(?i)against.*?2019 baseline.*?([+-]?\d+\.?\d*%)",
        r"(?i)since 2019.*?([+-]?\d+\.?\d*%)",
        r"(?i)from.*?2019 baseline.*?([+-]?\d+\.?\d*%)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EXPLANATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Brief explanation:\s*").unwrap());

/// Extract the sentiment word from one response section.
pub fn extract_sentiment(section: &str) -> String {
    for re in SENTIMENT_RES.iter() {
        if let Some(caps) = re.captures(section) {
            return caps[1].to_string();
        }
    }
    DEFAULT_SENTIMENT.to_string()
}

/// Extract the explanation: everything after `Brief explanation:` up to
/// the next labeled field. The regex crate has no look-ahead, so the
/// terminators are located by substring search instead.
pub fn extract_explanation(section: &str) -> String {
    if let Some(m) = EXPLANATION_RE.find(section) {
        let rest = &section[m.end()..];
        let lower = rest.to_ascii_lowercase();
        let mut end = rest.len();
        for term in ["previous year change", "baseline change", "sentiment"] {
            if let Some(pos) = lower.find(term) {
                end = end.min(pos);
            }
        }
        let explanation = rest[..end].trim();
        if !explanation.is_empty() {
            return explanation.to_string();
        }
    }
    DEFAULT_EXPLANATION.to_string()
}

/// Extract the change vs. the previous year, e.g. `-5%`.
pub fn extract_prev_year_change(section: &str) -> String {
    extract_change(section, &PREV_YEAR_RES)
}

/// Extract the change vs. the 2019 baseline, e.g. `+12%`.
pub fn extract_baseline_change(section: &str) -> String {
    extract_change(section, &BASELINE_RES)
}

/// Try `patterns` in order and normalize the first match to a signed
/// percentage string. Two-group patterns carry an increased/decreased
/// verb whose sign is applied to the bare number; single-group matches
/// without an explicit sign get a `+` prefix.
fn extract_change(section: &str, patterns: &[Regex]) -> String {
    for re in patterns {
        if let Some(caps) = re.captures(section) {
            if caps.len() > 2
                && let Some(value) = caps.get(2)
            {
                let sign = if caps[1].eq_ignore_ascii_case("increased") {
                    '+'
                } else {
                    '-'
                };
                return format!("{}{}%", sign, value.as_str());
            }
            let pct = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if pct.starts_with('+') || pct.starts_with('-') {
                return pct.to_string();
            }
            return format!("+{}", pct);
        }
    }
    DEFAULT_CHANGE.to_string()
}

/// Parse a concatenated batch response into per-row fields.
///
/// The response is split on `Sentence`; each non-empty section yields one
/// entry per field vector. Sections that omit a field get that field's
/// default, so output vectors stay aligned by position.
pub fn parse_analysis(response: &str) -> ParsedAnalysis {
    let mut parsed = ParsedAnalysis::default();

    for section in response.split("Sentence").skip(1) {
        if section.trim().is_empty() {
            continue;
        }
        parsed.sentiments.push(extract_sentiment(section));
        parsed.explanations.push(extract_explanation(section));
        parsed
            .prev_year_changes
            .push(extract_prev_year_change(section));
        parsed
            .baseline_changes
            .push(extract_baseline_change(section));
    }

    parsed
}
