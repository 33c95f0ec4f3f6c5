//! Page-range copying: lift a contiguous run of pages out of a report
//! into a new, smaller PDF, preserving order and content.

use std::ops::Range;
use std::path::Path;

use crate::PdfError;

/// Copy the 0-based, end-exclusive page index range `pages` from `input`
/// into a new document at `output`. Returns the number of pages copied.
///
/// A range reaching past the last page is a hard error, not a clamp.
pub fn copy_page_range(input: &Path, output: &Path, pages: Range<usize>) -> Result<usize, PdfError> {
    let mut doc =
        lopdf::Document::load(input).map_err(|e| PdfError::OpenError(e.to_string()))?;
    let page_count = doc.get_pages().len();

    if pages.start >= pages.end || pages.end > page_count {
        return Err(PdfError::PageOutOfRange {
            start: pages.start,
            end: pages.end,
            page_count,
        });
    }

    // lopdf numbers pages from 1; delete everything outside the kept range.
    let keep = (pages.start as u32 + 1)..=(pages.end as u32);
    let delete: Vec<u32> = (1..=page_count as u32)
        .filter(|n| !keep.contains(n))
        .collect();
    doc.delete_pages(&delete);
    doc.prune_objects();

    doc.save(output)
        .map_err(|e| PdfError::WriteError(e.to_string()))?;

    let copied = pages.end - pages.start;
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        copied,
        "copied page range"
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF with `n_pages` pages, each carrying a distinct one-line
    /// content stream, and save it to `path`.
    fn build_pdf(path: &Path, n_pages: usize) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for i in 0..n_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn page_content(doc: &Document, page_number: u32) -> Vec<u8> {
        let pages = doc.get_pages();
        let page_id = *pages.get(&page_number).unwrap();
        doc.get_page_content(page_id).unwrap()
    }

    #[test]
    fn test_copy_range_30_32_yields_two_verbatim_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.pdf");
        let output = dir.path().join("extract.pdf");
        build_pdf(&input, 40);

        let copied = copy_page_range(&input, &output, 30..32).unwrap();
        assert_eq!(copied, 2);

        let source = Document::load(&input).unwrap();
        let out = Document::load(&output).unwrap();
        assert_eq!(out.get_pages().len(), 2);
        // 0-based source indexes 30 and 31 are lopdf pages 31 and 32
        assert_eq!(page_content(&out, 1), page_content(&source, 31));
        assert_eq!(page_content(&out, 2), page_content(&source, 32));
    }

    #[test]
    fn test_copy_full_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.pdf");
        let output = dir.path().join("copy.pdf");
        build_pdf(&input, 3);

        let copied = copy_page_range(&input, &output, 0..3).unwrap();
        assert_eq!(copied, 3);
        assert_eq!(Document::load(&output).unwrap().get_pages().len(), 3);
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.pdf");
        let output = dir.path().join("never.pdf");
        build_pdf(&input, 5);

        let err = copy_page_range(&input, &output, 3..9).unwrap_err();
        assert!(matches!(
            err,
            PdfError::PageOutOfRange {
                start: 3,
                end: 9,
                page_count: 5
            }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_range_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.pdf");
        build_pdf(&input, 5);
        let err = copy_page_range(&input, &dir.path().join("out.pdf"), 2..2).unwrap_err();
        assert!(matches!(err, PdfError::PageOutOfRange { .. }));
    }

    #[test]
    fn test_missing_input_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_page_range(
            &dir.path().join("absent.pdf"),
            &dir.path().join("out.pdf"),
            0..1,
        )
        .unwrap_err();
        assert!(matches!(err, PdfError::OpenError(_)));
    }
}
