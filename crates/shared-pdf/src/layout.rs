//! Page-number position detection.
//!
//! Walks each page's content stream and collects standalone numeric tokens
//! sitting in the bottom band of the page. Only the text-positioning
//! operators needed for footer tokens are interpreted; rotation and skew are
//! ignored, which is adequate for axis-aligned page numbers.

use lopdf::content::Content;
use lopdf::{Document, Object};
use shared_types::{PageNumberObservation, PageNumberPosition};
use std::path::Path;

use crate::error::PdfError;
use crate::extractor::decode_pdf_string;

/// Fraction of page height (from the bottom edge) considered the footer band.
const BOTTOM_BAND: f32 = 0.10;
/// Left-edge fraction below which a token is "bottom-left".
const LEFT_BAND: f32 = 0.30;
/// Left-edge fraction above which a token is "bottom-right".
const RIGHT_BAND: f32 = 0.70;

/// Classify a token by its position on the page.
///
/// Pure function of (x, y, width, height); `y` is measured from the bottom
/// edge as in PDF user space. Returns `None` for tokens outside the footer
/// band.
pub fn classify_token(
    x: f32,
    y_from_bottom: f32,
    page_width: f32,
    page_height: f32,
) -> Option<PageNumberPosition> {
    if page_width <= 0.0 || page_height <= 0.0 {
        return None;
    }
    if y_from_bottom >= page_height * BOTTOM_BAND {
        return None;
    }
    let relative_x = x / page_width;
    Some(if relative_x < LEFT_BAND {
        PageNumberPosition::BottomLeft
    } else if relative_x > RIGHT_BAND {
        PageNumberPosition::BottomRight
    } else {
        PageNumberPosition::BottomCenter
    })
}

/// Detect candidate page-number tokens for every page of the document.
///
/// A page may yield zero, one, or multiple candidates (running footers can
/// contain other numbers); all of them are reported. Filtering ambiguous
/// pages is caller policy.
pub fn detect_page_number_positions(path: &Path) -> Result<Vec<PageNumberObservation>, PdfError> {
    let doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut observations = Vec::new();
    for (&page_number, &page_id) in &doc.get_pages() {
        let (x0, y0, width, height) = media_box(&doc, page_id);

        let content = match doc.get_page_content(page_id) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No content stream on page {}: {}", page_number, e);
                continue;
            }
        };
        let content = Content::decode(&content).map_err(|e| PdfError::ContentStream {
            page: page_number,
            message: e.to_string(),
        })?;

        for (text, x, y) in text_tokens(&content) {
            for word in text.split_whitespace() {
                if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
                    if let Some(position) = classify_token(x - x0, y - y0, width, height) {
                        observations.push(PageNumberObservation {
                            page: page_number,
                            position,
                            number: word.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(observations)
}

/// Minimal text-state machine: yields each shown string with the x/y of its
/// text-line origin.
fn text_tokens(content: &Content) -> Vec<(String, f32, f32)> {
    let mut tokens = Vec::new();
    let mut state = TextState::default();
    let mut in_text = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                state = TextState::default();
            }
            "ET" => in_text = false,
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(op.operands.first()), number(op.operands.get(1))) {
                    state.translate(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(op.operands.first()), number(op.operands.get(1))) {
                    state.leading = -ty;
                    state.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = number(op.operands.first()) {
                    state.leading = leading;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let nums: Vec<f32> = op.operands.iter().filter_map(|o| number(Some(o))).collect();
                    if nums.len() >= 6 {
                        state.set_matrix(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                    }
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        tokens.push((decode_pdf_string(bytes), state.x, state.y));
                    }
                }
            }
            "'" => {
                state.next_line();
                if in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        tokens.push((decode_pdf_string(bytes), state.x, state.y));
                    }
                }
            }
            "TJ" => {
                if in_text {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let mut combined = String::new();
                        for item in items {
                            if let Object::String(bytes, _) = item {
                                combined.push_str(&decode_pdf_string(bytes));
                            }
                        }
                        tokens.push((combined, state.x, state.y));
                    }
                }
            }
            _ => {}
        }
    }

    tokens
}

/// Text-space position tracking. Only translation components matter for
/// footer detection; the a/b/c/d entries are carried so Td offsets compose
/// with a scaled Tm.
#[derive(Debug, Clone, Copy)]
struct TextState {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    x: f32,
    y: f32,
    line_x: f32,
    line_y: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn set_matrix(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.x = e;
        self.y = f;
        self.line_x = e;
        self.line_y = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.x = self.line_x + tx * self.a + ty * self.c;
        self.y = self.line_y + tx * self.b + ty * self.d;
        self.line_x = self.x;
        self.line_y = self.y;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }
}

fn number(obj: Option<&Object>) -> Option<f32> {
    match obj {
        Some(Object::Integer(n)) => Some(*n as f32),
        Some(Object::Real(n)) => Some(*n),
        _ => None,
    }
}

/// Page dimensions from the MediaBox, walking up the page tree when the
/// entry is inherited. Defaults to US Letter when absent.
fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> (f32, f32, f32, f32) {
    let mut current = Some(page_id);
    // Bounded walk in case of a malformed circular parent chain.
    for _ in 0..32 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(Object::Array(values)) = dict.get(b"MediaBox") {
            let nums: Vec<f32> = values.iter().filter_map(|o| number(Some(o))).collect();
            if nums.len() == 4 {
                return (nums[0], nums[1], nums[2] - nums[0], nums[3] - nums[1]);
            }
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|obj| obj.as_reference().ok());
    }
    (0.0, 0.0, 612.0, 792.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tests::write_test_pdf_with_ops;
    use lopdf::content::Operation;
    use lopdf::StringFormat;
    use pretty_assertions::assert_eq;

    fn show_number_ops(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    text.as_bytes().to_vec(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_classify_token_buckets() {
        // 85% of width at 4% height: bottom-right
        assert_eq!(
            classify_token(520.2, 31.7, 612.0, 792.0),
            Some(PageNumberPosition::BottomRight)
        );
        // 10% of width: bottom-left
        assert_eq!(
            classify_token(61.0, 30.0, 612.0, 792.0),
            Some(PageNumberPosition::BottomLeft)
        );
        // Centered
        assert_eq!(
            classify_token(306.0, 30.0, 612.0, 792.0),
            Some(PageNumberPosition::BottomCenter)
        );
        // Above the footer band: not a candidate
        assert_eq!(classify_token(306.0, 400.0, 612.0, 792.0), None);
        // Exactly on the band boundary is outside it
        assert_eq!(classify_token(306.0, 79.2, 612.0, 792.0), None);
    }

    #[test]
    fn test_classify_token_is_deterministic() {
        let first = classify_token(100.0, 20.0, 595.0, 842.0);
        let second = classify_token(100.0, 20.0, 595.0, 842.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_detects_bottom_right_page_number() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_test_pdf_with_ops(file.path(), &[show_number_ops(520, 30, "7")]);

        let observations = detect_page_number_positions(file.path()).unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].page, 1);
        assert_eq!(observations[0].position, PageNumberPosition::BottomRight);
        assert_eq!(observations[0].number, "7");
    }

    #[test]
    fn test_ignores_numbers_outside_bottom_band() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_test_pdf_with_ops(file.path(), &[show_number_ops(300, 700, "2024")]);

        let observations = detect_page_number_positions(file.path()).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn test_ignores_non_numeric_footer_text() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_test_pdf_with_ops(file.path(), &[show_number_ops(300, 30, "Universitas")]);

        let observations = detect_page_number_positions(file.path()).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn test_reports_all_candidates_on_one_page() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut ops = show_number_ops(60, 30, "12");
        ops.extend(show_number_ops(520, 25, "12"));
        write_test_pdf_with_ops(file.path(), &[ops]);

        let observations = detect_page_number_positions(file.path()).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].position, PageNumberPosition::BottomLeft);
        assert_eq!(observations[1].position, PageNumberPosition::BottomRight);
    }

    #[test]
    fn test_tm_positioning_is_honored() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(300),
                    Object::Integer(28),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(b"33".to_vec(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ];
        write_test_pdf_with_ops(file.path(), &[ops]);

        let observations = detect_page_number_positions(file.path()).unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].position, PageNumberPosition::BottomCenter);
    }
}
