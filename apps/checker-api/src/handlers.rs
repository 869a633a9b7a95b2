//! HTTP handlers for the checker API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::pipeline;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Decode an uploaded PDF, tolerating a data-URL prefix from web clients.
fn decode_pdf(pdf_base64: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match pdf_base64.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => pdf_base64,
    };
    BASE64
        .decode(payload.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid PDF base64: {}", e)))
}

/// Check an uploaded thesis document.
///
/// Gate-rejected files answer 400 with the validation flags; the rejected
/// check is still recorded so it shows up in the statistics.
pub async fn check_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckDocumentRequest>,
) -> Result<Response, ApiError> {
    let pdf_data = decode_pdf(&req.pdf_base64)?;

    let check_id = Uuid::new_v4().to_string();
    let path = state.upload_dir.join(format!("thesis_{}.pdf", check_id));
    tokio::fs::write(&path, &pdf_data)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let outcome = pipeline::run_check(path, &state.rules, state.judge.as_ref()).await?;

    // Align the stored report with the row identifier.
    let report = outcome.analysis.as_ref().map(|a| {
        let mut report = a.report.clone();
        report.check_id = check_id.clone();
        report
    });

    // Template comparison is advisory and only attempted when a template is
    // stored and the model path is configured.
    let template_comparison = match (&outcome.analysis, &state.judge) {
        (Some(analysis), Some(judge)) => {
            let template: Option<String> = sqlx::query_scalar(
                "SELECT text FROM templates ORDER BY uploaded_at DESC LIMIT 1",
            )
            .fetch_optional(&state.db)
            .await?;
            match template {
                Some(template_text) => Some(
                    judge
                        .compare_with_template(&template_text, &analysis.full_text)
                        .await,
                ),
                None => None,
            }
        }
        _ => None,
    };

    let now = Utc::now();
    let (status, score, source) = match &report {
        Some(report) => (
            report.judgment.compliance_status.to_string(),
            report.judgment.overall_score as i64,
            match &report.source {
                shared_types::JudgmentSource::Model => "model",
                shared_types::JudgmentSource::RuleFallback { .. } => "rule_fallback",
            },
        ),
        None => ("REJECTED".to_string(), 0, "none"),
    };

    let validation_json =
        serde_json::to_string(&outcome.validation).map_err(|e| ApiError::Internal(e.into()))?;
    let report_json = report
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Internal(e.into()))?;
    let student_info_json = req
        .student_info
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO check_results (id, filename, student_info_json, validation_json, report_json, template_comparison, status, score, source, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&check_id)
    .bind(&req.filename)
    .bind(&student_info_json)
    .bind(&validation_json)
    .bind(&report_json)
    .bind(&template_comparison)
    .bind(&status)
    .bind(score)
    .bind(source)
    .bind(now.to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Checked document {} ({}): status {}, source {}",
        check_id,
        req.filename,
        status,
        source
    );

    let rejected = report.is_none();
    let response = CheckResponse {
        check_id,
        filename: req.filename,
        student_info: req.student_info,
        validation: outcome.validation,
        report,
        template_comparison,
        created_at: now,
    };

    if rejected {
        Ok((StatusCode::BAD_REQUEST, Json(response)).into_response())
    } else {
        Ok(Json(response).into_response())
    }
}

/// Get a stored check result by ID.
pub async fn get_check_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    let row: Option<DbCheckResult> = sqlx::query_as(
        r#"
        SELECT id, filename, student_info_json, validation_json, report_json, template_comparison, created_at
        FROM check_results
        WHERE id = ?
        "#,
    )
    .bind(&id)
    .fetch_optional(&state.db)
    .await?;

    let row = row.ok_or_else(|| ApiError::CheckNotFound(id.clone()))?;

    let validation =
        serde_json::from_str(&row.validation_json).map_err(|e| ApiError::Internal(e.into()))?;
    let report = row
        .report_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| ApiError::Internal(e.into()))?;
    let student_info = row
        .student_info_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(Json(CheckResponse {
        check_id: row.id,
        filename: row.filename,
        student_info,
        validation,
        report,
        template_comparison: row.template_comparison,
        created_at: row.created_at,
    }))
}

/// Upload an institutional template used for later comparisons.
pub async fn upload_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadTemplateRequest>,
) -> Result<Json<UploadTemplateResponse>, ApiError> {
    let pdf_data = decode_pdf(&req.pdf_base64)?;

    let template_id = Uuid::new_v4().to_string();
    let path = state.upload_dir.join(format!("template_{}.pdf", template_id));
    tokio::fs::write(&path, &pdf_data)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let document = tokio::task::spawn_blocking(move || shared_pdf::extract_document(&path))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    sqlx::query(
        r#"
        INSERT INTO templates (id, name, text, page_count, uploaded_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&template_id)
    .bind(&req.name)
    .bind(document.full_text())
    .bind(document.page_count as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!("Stored template {} ({})", template_id, req.name);

    Ok(Json(UploadTemplateResponse {
        template_id,
        name: req.name,
        page_count: document.page_count,
    }))
}

/// Aggregate statistics over stored checks.
pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let count = |status: &'static str| {
        let db = state.db.clone();
        async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM check_results WHERE status = ?")
                .bind(status)
                .fetch_one(&db)
                .await
        }
    };

    let total_checks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM check_results")
        .fetch_one(&state.db)
        .await?;
    let passed = count("PASS").await?;
    let needs_revision = count("NEEDS_REVISION").await?;
    let failed = count("FAIL").await?;
    let rejected = count("REJECTED").await?;

    // Time windows computed here so they compare RFC3339 against RFC3339.
    let now = Utc::now();
    let today_start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);
    let week_start = now - chrono::Duration::days(7);

    let since = |boundary: String| {
        let db = state.db.clone();
        async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM check_results WHERE created_at >= ?")
                .bind(boundary)
                .fetch_one(&db)
                .await
        }
    };
    let checks_today = since(today_start.to_rfc3339()).await?;
    let checks_this_week = since(week_start.to_rfc3339()).await?;

    let average_score: Option<f64> =
        sqlx::query_scalar("SELECT AVG(score) FROM check_results WHERE status != 'REJECTED'")
            .fetch_one(&state.db)
            .await?;

    let model_judgments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM check_results WHERE source = 'model'")
            .fetch_one(&state.db)
            .await?;
    let rule_fallbacks: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM check_results WHERE source = 'rule_fallback'")
            .fetch_one(&state.db)
            .await?;

    let completed = total_checks - rejected;
    let pass_rate = if completed > 0 {
        passed as f64 / completed as f64
    } else {
        0.0
    };

    Ok(Json(StatisticsResponse {
        total_checks,
        passed,
        needs_revision,
        failed,
        rejected,
        checks_today,
        checks_this_week,
        average_score: average_score.unwrap_or(0.0),
        pass_rate,
        model_judgments,
        rule_fallbacks,
    }))
}
