//! Required-section presence scan.

/// Outcome of scanning a document for the required section headings.
///
/// Every required section lands in exactly one of the two lists, in the
/// order the rule set declares them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionScan {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

/// Case-insensitive substring search for each required section name.
///
/// A section counts as found iff its uppercased name appears anywhere in
/// the uppercased full text.
pub fn classify_sections(text: &str, required: &[String]) -> SectionScan {
    let text_upper = text.to_uppercase();

    let mut found = Vec::new();
    let mut missing = Vec::new();
    for section in required {
        if text_upper.contains(&section.to_uppercase()) {
            found.push(section.clone());
        } else {
            missing.push(section.clone());
        }
    }

    SectionScan { found, missing }
}
