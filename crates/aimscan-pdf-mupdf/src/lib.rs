use std::path::Path;

use mupdf::{Document, TextPageFlags};

use aimscan_pdf::{PdfBackend, PdfError, TextLine};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-PDF code paths do not transitively
/// depend on it.
///
/// Each extracted line carries the largest glyph size among its spans;
/// the section scanner uses that to drop footnotes and running headers
/// instead of positional heuristics, since annual reports mix single-
/// and multi-column layouts where position is unreliable.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_lines(&self, path: &Path) -> Result<Vec<Vec<TextLine>>, PdfError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| PdfError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| PdfError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| PdfError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| PdfError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| PdfError::ExtractionError(e.to_string()))?;

            // Block/line iteration keeps document order within the page
            let mut lines = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let mut text = String::new();
                    let mut max_font_size = 0.0f32;
                    for ch in line.chars() {
                        text.push(ch.char().unwrap_or('\u{FFFD}'));
                        max_font_size = max_font_size.max(ch.size());
                    }
                    if text.trim().is_empty() {
                        continue;
                    }
                    lines.push(TextLine::new(text, max_font_size));
                }
            }
            pages.push(lines);
        }

        Ok(pages)
    }
}
