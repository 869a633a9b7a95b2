//! Cheap structural sanity checks, run before any deeper analysis.

use lopdf::Document;
use shared_types::PdfValidation;
use std::path::Path;

/// Validate basic properties of a purported PDF file.
///
/// This is a gate, not a scorer. Any parse failure yields all flags false
/// rather than an error; the caller treats a failed gate as "reject before
/// further processing".
pub fn validate_pdf_file(path: &Path, min_pages: u32) -> PdfValidation {
    let mut result = PdfValidation::default();

    let doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("PDF validation failed for {}: {}", path.display(), e);
            return result;
        }
    };

    result.is_valid_pdf = true;

    let pages = doc.get_pages();
    if !pages.is_empty() {
        result.is_readable = true;
    }

    // First page must carry a meaningful amount of extractable text,
    // otherwise the document is likely scanned images.
    if let Some(&first) = pages.keys().next() {
        let first_page_text = doc.extract_text(&[first]).unwrap_or_default();
        if first_page_text.trim().chars().count() > 100 {
            result.has_text = true;
        }
    }

    if pages.len() as u32 >= min_pages {
        result.page_count_valid = true;
    }

    result
}
