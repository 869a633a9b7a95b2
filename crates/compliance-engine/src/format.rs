//! Basic format checks over the raw extracted text.
//!
//! These are advisory strings: the first three are machine-checked against
//! the text, the reminders are carried verbatim from the rule set because
//! font, margin, and spacing cannot be verified through text extraction.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::FormatRuleSet;

lazy_static! {
    /// Chapter headings: "BAB" followed by a Roman numeral.
    static ref BAB_HEADING: Regex = Regex::new(r"BAB\s+[IVX]+\s+").unwrap();
}

/// Characters of extracted text that roughly amount to one printed page.
const CHARS_PER_PAGE: usize = 2000;
/// A complete thesis has at least this many "BAB" chapters.
const MIN_CHAPTERS: usize = 5;

/// Scan the document text for basic format problems.
pub fn basic_format_issues(text: &str, rules: &FormatRuleSet) -> Vec<String> {
    let mut issues = Vec::new();
    let text_upper = text.to_uppercase();

    // Length estimate from character count. The true page count is checked
    // separately against metadata; this string is kept for parity with
    // earlier reports.
    let estimated_pages = text.len() / CHARS_PER_PAGE;
    let min_pages = rules.min_page_count() as usize;
    if estimated_pages < min_pages {
        issues.push(format!(
            "Dokumen terlalu pendek (kurang dari {} halaman)",
            min_pages
        ));
    }

    let chapter_count = BAB_HEADING.find_iter(&text_upper).count();
    if chapter_count < MIN_CHAPTERS {
        issues.push(format!(
            "Struktur BAB tidak lengkap (minimal {} BAB)",
            MIN_CHAPTERS
        ));
    }

    if !text_upper.contains("DAFTAR PUSTAKA") {
        issues.push("Daftar Pustaka tidak ditemukan".to_string());
    }

    // Unverifiable requirements, carried through as reminders.
    issues.push(format!(
        "Margin sesuai panduan: kiri {}, kanan {}, atas {}, bawah {}",
        rules.margins.left, rules.margins.right, rules.margins.top, rules.margins.bottom
    ));
    issues.push(format!(
        "Ukuran font {}-{} pt (disarankan {} pt)",
        rules.font_size.min, rules.font_size.max, rules.font_size.recommended
    ));
    issues.push(format!("Spasi baris: {}", rules.line_spacing));

    issues
}

/// Fixed recommendations, led by an aggregate of the missing sections.
pub fn recommendations(missing_sections: &[String]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !missing_sections.is_empty() {
        recommendations.push(format!(
            "Lengkapi bagian yang hilang: {}",
            missing_sections.join(", ")
        ));
    }

    recommendations.extend(
        [
            "Pastikan format font Times New Roman 12pt",
            "Gunakan spasi 1.5 untuk isi dokumen",
            "Periksa margin sesuai panduan (kiri 4cm, kanan 3cm, atas-bawah 3cm)",
            "Pastikan penomoran halaman konsisten",
        ]
        .map(String::from),
    );

    recommendations
}
