//! Request and response models for the checker API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ComplianceReport, PdfValidation};
use sqlx::FromRow;

/// Request to check an uploaded thesis document.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckDocumentRequest {
    pub filename: String,
    pub pdf_base64: String,
    /// Free-form student metadata, stored and echoed back as-is.
    #[serde(default)]
    pub student_info: Option<serde_json::Value>,
}

/// Response for a completed (or gate-rejected) check.
///
/// `report` is absent when the file failed the PDF validation gate; the
/// flags in `validation` say why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub check_id: String,
    pub filename: String,
    pub student_info: Option<serde_json::Value>,
    pub validation: PdfValidation,
    pub report: Option<ComplianceReport>,
    pub template_comparison: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Check result row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct DbCheckResult {
    pub id: String,
    pub filename: String,
    pub student_info_json: Option<String>,
    pub validation_json: String,
    pub report_json: Option<String>,
    pub template_comparison: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to upload an institutional template.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTemplateRequest {
    pub name: String,
    pub pdf_base64: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadTemplateResponse {
    pub template_id: String,
    pub name: String,
    pub page_count: u32,
}

/// Aggregate statistics over stored checks.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub total_checks: i64,
    pub passed: i64,
    pub needs_revision: i64,
    pub failed: i64,
    pub rejected: i64,
    pub checks_today: i64,
    pub checks_this_week: i64,
    pub average_score: f64,
    /// Passed checks over completed (non-rejected) checks, 0.0 when none.
    pub pass_rate: f64,
    pub model_judgments: i64,
    pub rule_fallbacks: i64,
}
