use std::path::Path;

use crate::PdfError;

/// A rendered text line with the largest glyph size seen on it.
///
/// Font size is the classifier's only layout signal: small print
/// (footnotes, running headers) is filtered out before pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub max_font_size: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, max_font_size: f32) -> Self {
        Self {
            text: text.into(),
            max_font_size,
        }
    }
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level line extraction step; the
/// classification pipeline (aim headers, end-of-scope detection,
/// accumulation) lives in [`crate::section::SectionScanner`].
pub trait PdfBackend: Send + Sync {
    /// Extract text lines, grouped by page in document order.
    fn extract_lines(&self, path: &Path) -> Result<Vec<Vec<TextLine>>, PdfError>;
}
