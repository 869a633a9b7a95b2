//! PDF inspection for thesis checks
//!
//! This crate reads uploaded thesis PDFs: structural sanity checks, per-page
//! text extraction with metadata, and page-number position detection from
//! the raw content streams.

pub mod error;
pub mod extractor;
pub mod layout;
pub mod validator;

pub use error::PdfError;
pub use extractor::extract_document;
pub use layout::{classify_token, detect_page_number_positions};
pub use validator::validate_pdf_file;
