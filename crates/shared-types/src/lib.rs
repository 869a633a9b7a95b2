pub mod rules;
pub mod types;

pub use rules::{FormatRuleSet, PageLimits, PageNumberingPolicy};
pub use types::{
    ComplianceReport, ComplianceStatus, ExtractedDocument, Judgment, JudgmentSource, PageIssue,
    PageNumberObservation, PageNumberPosition, PageText, PdfValidation,
};
