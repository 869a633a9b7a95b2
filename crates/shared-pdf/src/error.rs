use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF has no pages")]
    Empty,

    #[error("Content stream error on page {page}: {message}")]
    ContentStream { page: u32, message: String },
}
