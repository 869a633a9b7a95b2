//! Text and metadata extraction.

use lopdf::{Document, Object};
use shared_types::{ExtractedDocument, PageText};
use std::path::Path;

use crate::error::PdfError;

/// Extract per-page text and document metadata from a validated PDF.
///
/// Pages that yield no extractable text (image-only pages) are substituted
/// with an empty string rather than failing the whole document. Metadata
/// strings are empty when the Info dictionary has no corresponding entry.
pub fn extract_document(path: &Path) -> Result<ExtractedDocument, PdfError> {
    let doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfError::Empty);
    }
    let page_count = pages.len() as u32;

    let mut page_texts = Vec::with_capacity(pages.len());
    for &number in pages.keys() {
        let text = match doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("No extractable text on page {}: {}", number, e);
                String::new()
            }
        };
        page_texts.push(PageText { number, text });
    }

    let (title, author, creation_date) = read_info(&doc);

    Ok(ExtractedDocument {
        pages: page_texts,
        page_count,
        title,
        author,
        creation_date,
    })
}

/// Title, author, and creation date from the trailer Info dictionary.
fn read_info(doc: &Document) -> (String, String, String) {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| obj.as_reference().ok())
        .and_then(|id| doc.get_dictionary(id).ok());

    match info {
        Some(dict) => (
            info_string(dict, b"Title"),
            info_string(dict, b"Author"),
            info_string(dict, b"CreationDate"),
        ),
        None => (String::new(), String::new(), String::new()),
    }
}

fn info_string(dict: &lopdf::Dictionary, key: &[u8]) -> String {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
        _ => String::new(),
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, byte-per-char
/// otherwise (PDFDocEncoding is ASCII-compatible for the range we care about).
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
