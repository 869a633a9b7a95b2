//! Prompt construction for the structure analysis and template comparison.

use std::fmt::Write;

/// Characters of document text sent to the analysis prompt.
const ANALYSIS_EXCERPT: usize = 8000;
/// Characters of each side sent to the template comparison prompt.
const COMPARISON_EXCERPT: usize = 4000;

/// Truncate to at most `limit` characters without splitting a code point.
fn excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Prompt asking the model to judge document structure against the required
/// section list. The model is told to answer with a single JSON object in
/// the report schema.
pub fn analysis_prompt(document_text: &str, required_sections: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Anda adalah pemeriksa format dokumen skripsi. Analisis struktur dan \
         format dokumen berikut terhadap pedoman penulisan.\n\n",
    );

    prompt.push_str("Bagian yang wajib ada:\n");
    for section in required_sections {
        let _ = writeln!(prompt, "- {}", section);
    }

    let _ = write!(
        prompt,
        "\nTeks dokumen (potongan):\n{}\n\n",
        excerpt(document_text, ANALYSIS_EXCERPT)
    );

    prompt.push_str(
        "Jawab HANYA dengan satu objek JSON valid, tanpa penjelasan lain, \
         dengan skema:\n\
         {\n\
           \"overall_score\": <0-100>,\n\
           \"missing_sections\": [\"...\"],\n\
           \"format_issues\": [\"...\"],\n\
           \"recommendations\": [\"...\"],\n\
           \"compliance_status\": \"PASS\" | \"FAIL\" | \"NEEDS_REVISION\"\n\
         }\n",
    );

    prompt
}

/// Prompt asking the model to compare a document against a stored template.
pub fn comparison_prompt(template_text: &str, document_text: &str) -> String {
    format!(
        "Bandingkan struktur dokumen skripsi berikut dengan template resmi.\n\n\
         Template (potongan):\n{}\n\n\
         Dokumen (potongan):\n{}\n\n\
         Sebutkan perbedaan struktur dan format yang penting dalam bahasa \
         Indonesia, sebagai daftar singkat.",
        excerpt(template_text, COMPARISON_EXCERPT),
        excerpt(document_text, COMPARISON_EXCERPT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        // Multi-byte characters near the cut point must not panic.
        let text = "é".repeat(10);
        assert_eq!(excerpt(&text, 4).chars().count(), 4);
        assert_eq!(excerpt("abc", 10), "abc");
    }

    #[test]
    fn test_analysis_prompt_truncates_long_documents() {
        let text = "x".repeat(20_000);
        let prompt = analysis_prompt(&text, &["ABSTRAK".to_string()]);
        // Excerpt plus the fixed scaffolding, far below the raw input size.
        assert!(prompt.len() < 10_000);
        assert!(prompt.contains("ABSTRAK"));
        assert!(prompt.contains("compliance_status"));
    }

    #[test]
    fn test_comparison_prompt_contains_both_sides() {
        let prompt = comparison_prompt("TEMPLATE ISI", "DOKUMEN ISI");
        assert!(prompt.contains("TEMPLATE ISI"));
        assert!(prompt.contains("DOKUMEN ISI"));
    }
}
