//! Institutional format rule set.
//!
//! Loaded once at startup and shared read-only across all checks. A missing
//! or malformed rule file never aborts startup: loading falls back to the
//! built-in defaults and logs a warning.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::PageNumberPosition;

/// The 15 canonical thesis sections required by the faculty guide.
pub const DEFAULT_REQUIRED_SECTIONS: &[&str] = &[
    "HALAMAN JUDUL",
    "LEMBAR PENGESAHAN",
    "ABSTRAK",
    "ABSTRACT",
    "KATA PENGANTAR",
    "DAFTAR ISI",
    "DAFTAR GAMBAR",
    "DAFTAR TABEL",
    "BAB I PENDAHULUAN",
    "BAB II TINJAUAN PUSTAKA",
    "BAB III METODOLOGI",
    "BAB IV HASIL DAN PEMBAHASAN",
    "BAB V KESIMPULAN",
    "DAFTAR PUSTAKA",
    "LAMPIRAN",
];

/// Font size thresholds in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSizeRule {
    pub min: u32,
    pub max: u32,
    pub recommended: u32,
}

impl Default for FontSizeRule {
    fn default() -> Self {
        Self {
            min: 11,
            max: 14,
            recommended: 12,
        }
    }
}

/// Margin reminders. These cannot be verified from extracted text alone and
/// are carried through as informational strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginRule {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl Default for MarginRule {
    fn default() -> Self {
        Self {
            top: "3 cm".to_string(),
            bottom: "3 cm".to_string(),
            left: "4 cm".to_string(),
            right: "3 cm".to_string(),
        }
    }
}

/// Page count bounds per degree level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLimits {
    pub undergraduate: u32,
    pub master: u32,
    pub phd: u32,
}

/// Expected page-number placement for odd and even pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNumberingPolicy {
    pub odd: PageNumberPosition,
    pub even: PageNumberPosition,
}

impl Default for PageNumberingPolicy {
    fn default() -> Self {
        Self {
            odd: PageNumberPosition::BottomRight,
            even: PageNumberPosition::BottomLeft,
        }
    }
}

/// The externally configured collection of required sections and
/// numeric/textual formatting thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRuleSet {
    pub required_sections: Vec<String>,
    pub font_size: FontSizeRule,
    pub line_spacing: String,
    pub margins: MarginRule,
    pub min_pages: PageLimits,
    pub max_pages: PageLimits,
    pub page_numbering: PageNumberingPolicy,
}

impl Default for FormatRuleSet {
    fn default() -> Self {
        Self {
            required_sections: DEFAULT_REQUIRED_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            font_size: FontSizeRule::default(),
            line_spacing: "1.5 spasi".to_string(),
            margins: MarginRule::default(),
            min_pages: PageLimits {
                undergraduate: 50,
                master: 80,
                phd: 120,
            },
            max_pages: PageLimits {
                undergraduate: 100,
                master: 150,
                phd: 200,
            },
            page_numbering: PageNumberingPolicy::default(),
        }
    }
}

impl FormatRuleSet {
    /// Load the rule set from a JSON file, degrading to the built-in
    /// defaults on any error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(rules) => rules,
                Err(e) => {
                    tracing::warn!("Malformed rule set {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read rule set {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Required sections for matching: the configured list, or the built-in
    /// enumeration when the configuration left it empty.
    pub fn effective_sections(&self) -> Vec<String> {
        if self.required_sections.is_empty() {
            DEFAULT_REQUIRED_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            self.required_sections.clone()
        }
    }

    /// Minimum page count for the default (undergraduate) degree level.
    pub fn min_page_count(&self) -> u32 {
        self.min_pages.undergraduate
    }
}
