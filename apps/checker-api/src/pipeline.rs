//! The check pipeline: validation gate, extraction, layout checks, and the
//! judgment step with its rule-based fallback.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use compliance_engine::{check_page_count, check_positions, evaluate};
use llm_judge::StructureJudge;
use shared_pdf::{detect_page_number_positions, extract_document, validate_pdf_file, PdfError};
use shared_types::{ComplianceReport, FormatRuleSet, Judgment, JudgmentSource, PdfValidation};
use uuid::Uuid;

use crate::error::ApiError;

/// Upper bound on one model call.
const MODEL_TIMEOUT: Duration = Duration::from_secs(30);
/// Retries after the first attempt.
const MAX_RETRIES: u32 = 1;
/// Base pause before a retry, doubled on each further attempt.
const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(500);

pub struct CheckOutcome {
    pub validation: PdfValidation,
    /// Absent when the file failed the validation gate.
    pub analysis: Option<CheckAnalysis>,
}

pub struct CheckAnalysis {
    pub report: ComplianceReport,
    /// Extracted text, kept for the optional template comparison.
    pub full_text: String,
}

/// Run the full check over a stored upload.
///
/// PDF parsing is synchronous lopdf work and runs on the blocking pool.
pub async fn run_check(
    path: PathBuf,
    rules: &FormatRuleSet,
    judge: Option<&StructureJudge>,
) -> Result<CheckOutcome, ApiError> {
    let min_pages = rules.min_page_count();
    let validation = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || validate_pdf_file(&path, min_pages))
            .await
            .map_err(|e| ApiError::Internal(e.into()))?
    };
    if !validation.passes_gate() {
        tracing::info!("Rejected at validation gate: {:?}", validation);
        return Ok(CheckOutcome {
            validation,
            analysis: None,
        });
    }

    let (document, observations) = tokio::task::spawn_blocking(move || {
        let document = extract_document(&path)?;
        let observations = detect_page_number_positions(&path)?;
        Ok::<_, PdfError>((document, observations))
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    // Layout findings are produced on both judgment paths.
    let mut page_issues = check_positions(&observations, rules);
    if let Some(issue) = check_page_count(document.page_count, rules) {
        page_issues.push(issue);
    }

    let full_text = document.full_text();
    let (judgment, source) = judgment_for(&full_text, rules, judge).await;

    let report = ComplianceReport {
        check_id: Uuid::new_v4().to_string(),
        checked_at: Utc::now(),
        judgment,
        page_issues,
        source,
    };

    Ok(CheckOutcome {
        validation,
        analysis: Some(CheckAnalysis { report, full_text }),
    })
}

/// Judgment with fallback: the model path when a judge is configured and
/// answers in time, the deterministic rule evaluator otherwise. The fallback
/// reason is recorded in the report source.
pub async fn judgment_for(
    text: &str,
    rules: &FormatRuleSet,
    judge: Option<&StructureJudge>,
) -> (Judgment, JudgmentSource) {
    let Some(judge) = judge else {
        return (
            evaluate(text, rules),
            JudgmentSource::RuleFallback {
                reason: "model unavailable".to_string(),
            },
        );
    };

    match model_judgment(judge, text, rules).await {
        Ok(judgment) => (judgment, JudgmentSource::Model),
        Err(reason) => {
            tracing::warn!("Falling back to rule evaluation: {}", reason);
            (
                evaluate(text, rules),
                JudgmentSource::RuleFallback { reason },
            )
        }
    }
}

/// Model calls with a per-attempt timeout and exponential backoff between
/// attempts.
async fn model_judgment(
    judge: &StructureJudge,
    text: &str,
    rules: &FormatRuleSet,
) -> Result<Judgment, String> {
    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            tokio::time::sleep(RETRY_BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
        }
        match model_attempt(judge, text, rules).await {
            Ok(judgment) => return Ok(judgment),
            Err(e) => {
                tracing::warn!("Model attempt {} failed: {}", attempt + 1, e);
                last_error = e;
            }
        }
    }
    Err(last_error)
}

async fn model_attempt(
    judge: &StructureJudge,
    text: &str,
    rules: &FormatRuleSet,
) -> Result<Judgment, String> {
    match tokio::time::timeout(MODEL_TIMEOUT, judge.analyze(text, rules)).await {
        Ok(Ok(judgment)) => Ok(judgment),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "model timed out after {}s",
            MODEL_TIMEOUT.as_secs()
        )),
    }
}
