//! Model output parsing.
//!
//! The model is asked for a single JSON object but does not always comply.
//! Parsing therefore has two layers: a JSON path that tolerates missing
//! fields, and a text heuristic that salvages a score and a verdict from
//! free-form prose. Parsing never fails; the heuristic always produces a
//! judgment.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use shared_types::{ComplianceStatus, Judgment};

lazy_static! {
    /// A score written as "72/100" or "72%".
    static ref SCORE: Regex = Regex::new(r"(\d+)(?:/100|%)").unwrap();
}

/// Score assumed when prose states no usable number.
const HEURISTIC_DEFAULT_SCORE: u32 = 50;

#[derive(Debug, Deserialize)]
struct RawJudgment {
    // Some replies write fractional scores; accepted and truncated.
    overall_score: Option<f64>,
    #[serde(default)]
    missing_sections: Vec<String>,
    #[serde(default)]
    format_issues: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    compliance_status: Option<String>,
}

/// Parse the model's reply into a judgment.
pub fn parse_judgment(raw: &str) -> Judgment {
    if let Some(judgment) = parse_json(raw) {
        return judgment;
    }
    tracing::debug!("Model reply is not valid JSON, using text heuristics");
    parse_heuristic(raw)
}

/// Strict path: the JSON object between the first `{` and the last `}`.
fn parse_json(raw: &str) -> Option<Judgment> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    let parsed: RawJudgment = serde_json::from_str(&raw[start..=end]).ok()?;

    Some(Judgment {
        overall_score: parsed.overall_score.unwrap_or(0.0).clamp(0.0, 100.0) as u32,
        missing_sections: parsed.missing_sections,
        format_issues: parsed.format_issues,
        recommendations: parsed.recommendations,
        compliance_status: status_from_label(parsed.compliance_status.as_deref().unwrap_or("")),
    })
}

/// Salvage path for free-form prose.
fn parse_heuristic(raw: &str) -> Judgment {
    let overall_score = SCORE
        .captures(raw)
        .and_then(|c| c[1].parse::<u32>().ok())
        .unwrap_or(HEURISTIC_DEFAULT_SCORE)
        .min(100);

    Judgment {
        overall_score,
        missing_sections: Vec::new(),
        format_issues: Vec::new(),
        recommendations: Vec::new(),
        compliance_status: status_from_label(raw),
    }
}

fn status_from_label(text: &str) -> ComplianceStatus {
    let upper = text.to_uppercase();
    if upper.contains("PASS") {
        ComplianceStatus::Pass
    } else if upper.contains("FAIL") {
        ComplianceStatus::Fail
    } else {
        ComplianceStatus::NeedsRevision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_well_formed_json_reply() {
        let raw = r#"{
            "overall_score": 85,
            "missing_sections": ["LAMPIRAN"],
            "format_issues": [],
            "recommendations": ["Tambahkan lampiran"],
            "compliance_status": "PASS"
        }"#;
        let judgment = parse_judgment(raw);
        assert_eq!(judgment.overall_score, 85);
        assert_eq!(judgment.missing_sections, vec!["LAMPIRAN"]);
        assert_eq!(judgment.compliance_status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = "Berikut hasil analisis:\n```json\n{\"overall_score\": 40, \"compliance_status\": \"NEEDS_REVISION\"}\n```\nSemoga membantu.";
        let judgment = parse_judgment(raw);
        assert_eq!(judgment.overall_score, 40);
        assert_eq!(judgment.compliance_status, ComplianceStatus::NeedsRevision);
        assert!(judgment.missing_sections.is_empty());
    }

    #[test]
    fn test_free_form_reply_falls_back_to_heuristics() {
        let raw = "Based on review, overall_score\": 72 no valid json";
        let judgment = parse_judgment(raw);
        // No "72/100" or "72%" marker, so the default score applies.
        assert_eq!(judgment.overall_score, 50);
        assert_eq!(judgment.compliance_status, ComplianceStatus::NeedsRevision);
    }

    #[test]
    fn test_heuristic_reads_slash_hundred_scores() {
        let judgment = parse_judgment("Dokumen ini mendapat nilai 72/100 dan dinyatakan FAIL.");
        assert_eq!(judgment.overall_score, 72);
        assert_eq!(judgment.compliance_status, ComplianceStatus::Fail);
    }

    #[test]
    fn test_heuristic_reads_percent_scores_and_pass_label() {
        let judgment = parse_judgment("Skor akhir: 90%. Status: PASS.");
        assert_eq!(judgment.overall_score, 90);
        assert_eq!(judgment.compliance_status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_fractional_score_stays_on_json_path() {
        let raw = r#"{
            "overall_score": 85.5,
            "missing_sections": ["LAMPIRAN"],
            "recommendations": ["Tambahkan lampiran"],
            "compliance_status": "PASS"
        }"#;
        let judgment = parse_judgment(raw);
        assert_eq!(judgment.overall_score, 85);
        // Structured fields survive; a fractional score must not demote the
        // reply to the prose heuristics.
        assert_eq!(judgment.missing_sections, vec!["LAMPIRAN"]);
        assert_eq!(judgment.recommendations, vec!["Tambahkan lampiran"]);
        assert_eq!(judgment.compliance_status, ComplianceStatus::Pass);
    }

    #[test]
    fn test_scores_above_hundred_are_clamped() {
        let judgment = parse_judgment(r#"{"overall_score": 250, "compliance_status": "PASS"}"#);
        assert_eq!(judgment.overall_score, 100);
    }

    #[test]
    fn test_json_with_missing_fields_gets_defaults() {
        let judgment = parse_judgment("{}");
        assert_eq!(judgment.overall_score, 0);
        assert_eq!(judgment.compliance_status, ComplianceStatus::NeedsRevision);
        assert!(judgment.format_issues.is_empty());
    }
}
