//! Rule-based structure judgment.

use shared_types::{ComplianceStatus, FormatRuleSet, Judgment};

use crate::format;
use crate::sections::classify_sections;

/// Score at or above which the rule path grants PASS.
const PASS_THRESHOLD: u32 = 80;

/// Deterministic judgment of the document text against the rule set.
///
/// Score is the fraction of required sections present, floored to an
/// integer percentage. This path only ever yields PASS or NEEDS_REVISION;
/// FAIL can originate only from the model path. That asymmetry matches the
/// institution's current policy and is preserved deliberately.
pub fn evaluate(text: &str, rules: &FormatRuleSet) -> Judgment {
    let required = rules.effective_sections();
    let scan = classify_sections(text, &required);

    let overall_score = (scan.found.len() * 100 / required.len()) as u32;

    let compliance_status = if overall_score >= PASS_THRESHOLD {
        ComplianceStatus::Pass
    } else {
        ComplianceStatus::NeedsRevision
    };

    Judgment {
        overall_score,
        format_issues: format::basic_format_issues(text, rules),
        recommendations: format::recommendations(&scan.missing),
        missing_sections: scan.missing,
        compliance_status,
    }
}
