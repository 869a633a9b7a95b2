//! Page-level policy checks: numbering placement and true page count.

use shared_types::{FormatRuleSet, PageIssue, PageNumberObservation, PageNumberPosition};

/// Compare each observed page number against the configured placement policy
/// for odd and even pages. Every mismatch names the offending page, the
/// detected position, and the expected one.
pub fn check_positions(
    observations: &[PageNumberObservation],
    rules: &FormatRuleSet,
) -> Vec<PageIssue> {
    let mut issues = Vec::new();

    for obs in observations {
        if obs.position == PageNumberPosition::NotFound {
            continue;
        }
        let expected = if obs.page % 2 == 1 {
            rules.page_numbering.odd
        } else {
            rules.page_numbering.even
        };
        if obs.position != expected {
            issues.push(PageIssue {
                page: Some(obs.page),
                issue: format!(
                    "Nomor halaman terdeteksi di {} (seharusnya {})",
                    obs.position, expected
                ),
            });
        }
    }

    issues
}

/// True page count from document metadata against the configured minimum.
///
/// The rule evaluator's too-short warning estimates length from character
/// count; this check uses the real count the extractor already knows.
pub fn check_page_count(page_count: u32, rules: &FormatRuleSet) -> Option<PageIssue> {
    let min_pages = rules.min_page_count();
    if page_count < min_pages {
        Some(PageIssue {
            page: None,
            issue: format!("Jumlah halaman kurang dari {}", min_pages),
        })
    } else {
        None
    }
}
