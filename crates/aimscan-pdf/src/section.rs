use once_cell::sync::Lazy;
use regex::Regex;

use aimscan_core::AimCategory;

use crate::backend::TextLine;

/// Minimum glyph size a line needs to be classified at all. Smaller lines
/// are footnotes, folios, or running headers and are discarded.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 7.5;

static AIM_HEADER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    AimCategory::ALL
        .iter()
        .map(|aim| Regex::new(&format!(r"(?i)\bAim\s?{}\b", aim.number())).unwrap())
        .collect()
});

/// A line matching this ends the current section without starting a new
/// aim: any other aim number, or the back-matter headers.
static END_OF_SCOPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bAim\s?\d+\b|\bAppendix\b|\bGlossary\b").unwrap());

/// Accumulated line fragments, one buffer per aim category.
#[derive(Debug, Clone, Default)]
pub struct AimBuffers {
    parts: [Vec<String>; 5],
}

impl AimBuffers {
    fn push(&mut self, aim: AimCategory, text: &str) {
        self.parts[aim.index()].push(text.trim().to_string());
    }

    /// Fragment count for one aim (mostly useful in tests).
    pub fn len(&self, aim: AimCategory) -> usize {
        self.parts[aim.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.is_empty())
    }

    /// Join one aim's fragments into a single space-separated paragraph,
    /// stripped of everything outside printable ASCII.
    pub fn content(&self, aim: AimCategory) -> String {
        sanitize_printable_ascii(&self.parts[aim.index()].join(" "))
    }
}

/// Remove every character outside the printable ASCII range (0x20–0x7E).
/// Extracted report text is stored in spreadsheets that choke on control
/// characters and private-use glyphs common in PDF fonts.
pub fn sanitize_printable_ascii(text: &str) -> String {
    text.chars().filter(|c| (' '..='~').contains(c)).collect()
}

/// Classifies text lines into aim sections.
///
/// At most one aim is "current" at any point, held as an
/// `Option<AimCategory>` so an invalid multi-active state cannot be
/// represented. A header line switches the current aim (and is itself
/// accumulated into that aim's buffer); an end-of-scope line clears it.
#[derive(Debug, Clone)]
pub struct SectionScanner {
    min_font_size: f32,
}

impl Default for SectionScanner {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
        }
    }
}

impl SectionScanner {
    pub fn new(min_font_size: f32) -> Self {
        Self { min_font_size }
    }

    /// Classify a single line, updating `current` and `buffers`.
    ///
    /// Order matters: the font filter runs first, then aim headers (lowest
    /// aim number wins), then end-of-scope, then accumulation into the
    /// currently active buffer.
    pub fn scan_line(
        &self,
        line: &TextLine,
        current: &mut Option<AimCategory>,
        buffers: &mut AimBuffers,
    ) {
        if line.max_font_size < self.min_font_size {
            return;
        }

        let header_match = AimCategory::ALL
            .iter()
            .find(|aim| AIM_HEADER_RES[aim.index()].is_match(&line.text))
            .copied();

        if let Some(aim) = header_match {
            *current = Some(aim);
        } else if END_OF_SCOPE_RE.is_match(&line.text) {
            *current = None;
        }

        if let Some(aim) = *current {
            buffers.push(aim, &line.text);
        }
    }

    /// Scan all pages of a document in order, carrying the current-section
    /// state across page boundaries, and return the accumulated buffers.
    pub fn scan_pages(&self, pages: &[Vec<TextLine>]) -> AimBuffers {
        let mut buffers = AimBuffers::default();
        let mut current: Option<AimCategory> = None;
        for page in pages {
            for line in page {
                self.scan_line(line, &mut current, &mut buffers);
            }
        }
        buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> TextLine {
        TextLine::new(text, 10.0)
    }

    fn small(text: &str) -> TextLine {
        TextLine::new(text, 6.0)
    }

    #[test]
    fn test_small_font_lines_never_accumulate() {
        let scanner = SectionScanner::default();
        let pages = vec![vec![
            line("Aim 1"),
            small("footnote under the threshold"),
            line("real body text"),
        ]];
        let buffers = scanner.scan_pages(&pages);
        let content = buffers.content(AimCategory::Aim1);
        assert!(content.contains("real body text"));
        assert!(!content.contains("footnote"));
    }

    #[test]
    fn test_small_font_header_does_not_switch_section() {
        let scanner = SectionScanner::default();
        let pages = vec![vec![line("Aim 1"), small("Aim 2"), line("still aim one")]];
        let buffers = scanner.scan_pages(&pages);
        assert!(buffers.content(AimCategory::Aim1).contains("still aim one"));
        assert!(buffers.content(AimCategory::Aim2).is_empty());
    }

    #[test]
    fn test_header_activates_exactly_one_category() {
        let scanner = SectionScanner::default();
        let mut current = Some(AimCategory::Aim4);
        let mut buffers = AimBuffers::default();
        scanner.scan_line(&line("Aim 2: our methane target"), &mut current, &mut buffers);
        assert_eq!(current, Some(AimCategory::Aim2));
    }

    #[test]
    fn test_header_line_included_in_own_buffer() {
        // Reference behavior: the header line itself is accumulated.
        let scanner = SectionScanner::default();
        let buffers = scanner.scan_pages(&[vec![line("Aim 3 progress"), line("more detail")]]);
        assert_eq!(buffers.content(AimCategory::Aim3), "Aim 3 progress more detail");
    }

    #[test]
    fn test_end_of_scope_clears_capture() {
        let scanner = SectionScanner::default();
        let pages = vec![vec![
            line("Aim 1"),
            line("captured text"),
            line("Appendix"),
            line("should not be captured"),
        ]];
        let buffers = scanner.scan_pages(&pages);
        let content = buffers.content(AimCategory::Aim1);
        assert!(content.contains("captured text"));
        assert!(!content.contains("should not be captured"));
    }

    #[test]
    fn test_glossary_and_higher_aim_numbers_end_scope() {
        let scanner = SectionScanner::default();
        for end in ["Glossary", "Aim 7 extension"] {
            let pages = vec![vec![line("Aim 5"), line(end), line("orphan line")]];
            let buffers = scanner.scan_pages(&pages);
            assert!(!buffers.content(AimCategory::Aim5).contains("orphan line"));
        }
    }

    #[test]
    fn test_header_variants_match() {
        let scanner = SectionScanner::default();
        // The pattern allows zero or one space and ignores case
        for header in ["aim 2", "AIM2", "Our Aim 2 commitments"] {
            let mut current = None;
            let mut buffers = AimBuffers::default();
            scanner.scan_line(&line(header), &mut current, &mut buffers);
            assert_eq!(current, Some(AimCategory::Aim2), "header: {:?}", header);
        }
    }

    #[test]
    fn test_state_persists_across_pages() {
        let scanner = SectionScanner::default();
        let pages = vec![
            vec![line("Aim 4"), line("page one tail")],
            vec![line("page two head")],
        ];
        let buffers = scanner.scan_pages(&pages);
        let content = buffers.content(AimCategory::Aim4);
        assert!(content.contains("page one tail"));
        assert!(content.contains("page two head"));
    }

    #[test]
    fn test_lines_before_any_header_are_dropped() {
        let scanner = SectionScanner::default();
        let buffers = scanner.scan_pages(&[vec![line("preamble"), line("Aim 1"), line("body")]]);
        assert!(!buffers.content(AimCategory::Aim1).contains("preamble"));
    }

    #[test]
    fn test_sanitize_strips_non_printable_ascii() {
        assert_eq!(
            sanitize_printable_ascii("CO\u{2082} emissions \u{2192} down 5%\n"),
            "CO emissions  down 5%"
        );
        assert_eq!(sanitize_printable_ascii("plain ~text~"), "plain ~text~");
    }

    #[test]
    fn test_ordering_preserved_within_buffer() {
        let scanner = SectionScanner::default();
        let pages = vec![vec![line("Aim 1"), line("first"), line("second"), line("third")]];
        let buffers = scanner.scan_pages(&pages);
        assert_eq!(buffers.content(AimCategory::Aim1), "Aim 1 first second third");
    }
}
