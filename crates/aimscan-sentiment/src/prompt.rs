//! The fixed analyst prompt and per-row request text preparation.

use aimscan_core::ParagraphRecord;

/// System prompt sent with every batch. The response format it demands
/// (`Sentence N:` sections with labeled fields) is what
/// [`crate::parse::parse_analysis`] expects to find.
pub const SYSTEM_PROMPT: &str = "\
You are an ESG report analyst. Analyze the following sentences from a company's annual ESG report.
For each sentence, you MUST provide ALL of the following information, inferring from context if necessary:

1. Sentiment (Positive/Negative/Neutral)
2. Brief explanation
3. Percentage change comparison with previous year (ALWAYS include + or - sign)
4. Percentage change comparison with 2019 baseline (ALWAYS include + or - sign)

If a specific percentage is not mentioned:
- For no change, use \"+0%\"
- For increases without specific numbers, use \"+1%\"
- For decreases without specific numbers, use \"-1%\"

Format your response EXACTLY as follows for each sentence:
Sentence 1:
Sentiment: [sentiment]
Brief explanation: [explanation]
Previous year change: [MUST include sign, e.g., +0%, +1%, -1%]
Baseline change: [MUST include sign, e.g., +0%, +1%, -1%]";

/// Serialize records into numbered request lines:
/// `Sentence N: Aim: <aim> | Year: <year> | Content: <content>`.
///
/// Numbering follows the record order (callers sort by year first).
/// Blank aim or content fields are left out of the line; the year is
/// always present, so every row produces exactly one line.
pub fn prepare_rows(records: &[ParagraphRecord]) -> Vec<String> {
    let mut texts = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let mut parts = Vec::new();
        if !record.aim.trim().is_empty() {
            parts.push(format!("Aim: {}", record.aim));
        }
        parts.push(format!("Year: {}", record.year));
        if !record.content.trim().is_empty() {
            parts.push(format!("Content: {}", record.content));
        }
        texts.push(format!("Sentence {}: {}", i + 1, parts.join(" | ")));
    }
    texts
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_core::AimCategory;

    #[test]
    fn test_prepare_rows_format() {
        let records = vec![ParagraphRecord::new(
            AimCategory::Aim1,
            2021,
            "Net zero operations".into(),
        )];
        let texts = prepare_rows(&records);
        assert_eq!(
            texts,
            vec!["Sentence 1: Aim: Aim 1 | Year: 2021 | Content: Net zero operations"]
        );
    }

    #[test]
    fn test_prepare_rows_skips_empty_content_field() {
        let records = vec![ParagraphRecord {
            aim: "Aim 2".into(),
            year: 2022,
            content: "   ".into(),
        }];
        let texts = prepare_rows(&records);
        assert_eq!(texts, vec!["Sentence 1: Aim: Aim 2 | Year: 2022"]);
    }

    #[test]
    fn test_prepare_rows_blank_fields_still_produce_a_line() {
        let records = vec![ParagraphRecord {
            aim: String::new(),
            year: 2020,
            content: "  ".into(),
        }];
        assert_eq!(prepare_rows(&records), vec!["Sentence 1: Year: 2020"]);
    }

    #[test]
    fn test_prepare_rows_numbering_follows_position() {
        let records = vec![
            ParagraphRecord::new(AimCategory::Aim1, 2020, "a".into()),
            ParagraphRecord::new(AimCategory::Aim2, 2020, "b".into()),
            ParagraphRecord::new(AimCategory::Aim3, 2020, "c".into()),
        ];
        let texts = prepare_rows(&records);
        assert!(texts[2].starts_with("Sentence 3:"));
    }
}
