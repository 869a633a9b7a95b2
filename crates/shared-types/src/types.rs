//! Core data model for thesis document checks.

use serde::{Deserialize, Serialize};

/// Text of a single page, tagged with its 1-based page index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// A document after extraction: per-page text plus embedded metadata.
///
/// Created once per uploaded file and never mutated afterwards. Metadata
/// strings are empty when the PDF carries no corresponding entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub pages: Vec<PageText>,
    pub page_count: u32,
    pub title: String,
    pub author: String,
    pub creation_date: String,
}

impl ExtractedDocument {
    /// Concatenated text across all pages with explicit page boundary
    /// markers, so later text search can still resolve which page a match
    /// is approximately on.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&format!("\n--- PAGE {} ---\n", page.number));
            out.push_str(&page.text);
            out.push('\n');
        }
        out
    }
}

/// Structural verdict from the cheap PDF sanity checks.
///
/// Any parse failure yields all flags false; the pipeline rejects the file
/// before deeper analysis unless `is_valid_pdf` and `is_readable` both hold.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PdfValidation {
    pub is_valid_pdf: bool,
    pub is_readable: bool,
    pub has_text: bool,
    pub page_count_valid: bool,
}

impl PdfValidation {
    pub fn passes_gate(&self) -> bool {
        self.is_valid_pdf && self.is_readable
    }
}

/// Bucketed placement of a page-bottom numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageNumberPosition {
    BottomLeft,
    BottomCenter,
    BottomRight,
    NotFound,
}

impl std::fmt::Display for PageNumberPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageNumberPosition::BottomLeft => write!(f, "bottom-left"),
            PageNumberPosition::BottomCenter => write!(f, "bottom-center"),
            PageNumberPosition::BottomRight => write!(f, "bottom-right"),
            PageNumberPosition::NotFound => write!(f, "not-found"),
        }
    }
}

/// A candidate page number observed in the bottom band of a page.
///
/// A page may yield zero, one, or several of these; filtering ambiguous
/// multi-candidate pages is caller policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNumberObservation {
    pub page: u32,
    pub position: PageNumberPosition,
    pub number: String,
}

/// Final categorical verdict attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "NEEDS_REVISION")]
    NeedsRevision,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Pass => write!(f, "PASS"),
            ComplianceStatus::Fail => write!(f, "FAIL"),
            ComplianceStatus::NeedsRevision => write!(f, "NEEDS_REVISION"),
        }
    }
}

/// Structured output of either evaluation path (rule-based or model-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub overall_score: u32,
    pub missing_sections: Vec<String>,
    pub format_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub compliance_status: ComplianceStatus,
}

/// A page-level finding from the layout checks.
///
/// `page` is `None` when the issue applies to the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageIssue {
    pub page: Option<u32>,
    pub issue: String,
}

/// How the judgment in a report was produced.
///
/// `RuleFallback` means the model path failed and the deterministic rule
/// evaluator supplied the judgment instead; the reason records why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JudgmentSource {
    Model,
    RuleFallback { reason: String },
}

/// One completed check. Produced fresh per invocation; a re-check yields a
/// new report with a new identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub check_id: String,
    pub checked_at: chrono::DateTime<chrono::Utc>,
    pub judgment: Judgment,
    pub page_issues: Vec<PageIssue>,
    pub source: JudgmentSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_text_inserts_page_markers() {
        let doc = ExtractedDocument {
            pages: vec![
                PageText {
                    number: 1,
                    text: "ABSTRAK".to_string(),
                },
                PageText {
                    number: 2,
                    text: String::new(),
                },
            ],
            page_count: 2,
            title: String::new(),
            author: String::new(),
            creation_date: String::new(),
        };
        let text = doc.full_text();
        assert!(text.contains("--- PAGE 1 ---"));
        assert!(text.contains("--- PAGE 2 ---"));
        assert!(text.contains("ABSTRAK"));
    }

    #[test]
    fn test_compliance_status_serializes_to_locale_labels() {
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::Pass).unwrap(),
            "\"PASS\""
        );
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::NeedsRevision).unwrap(),
            "\"NEEDS_REVISION\""
        );
    }

    #[test]
    fn test_validation_gate() {
        let v = PdfValidation {
            is_valid_pdf: true,
            is_readable: true,
            has_text: false,
            page_count_valid: false,
        };
        assert!(v.passes_gate());
        assert!(!PdfValidation::default().passes_gate());
    }
}
