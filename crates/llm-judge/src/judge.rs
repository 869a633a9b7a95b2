//! Model-backed structure judgment.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{FormatRuleSet, Judgment};

use crate::error::JudgeError;
use crate::parse::parse_judgment;
use crate::prompt;

/// A text completion backend. Production uses the Groq client; tests swap in
/// a scripted provider.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError>;
}

/// Judges document structure by prompting a completion backend.
#[derive(Clone)]
pub struct StructureJudge {
    provider: Arc<dyn TextCompletion>,
}

impl StructureJudge {
    pub fn new(provider: Arc<dyn TextCompletion>) -> Self {
        Self { provider }
    }

    /// Ask the model for a structural judgment of the document text.
    ///
    /// Transport and API errors surface as `Err`; a reply that arrives is
    /// always parsed into a judgment, however malformed.
    pub async fn analyze(
        &self,
        document_text: &str,
        rules: &FormatRuleSet,
    ) -> Result<Judgment, JudgeError> {
        let required = rules.effective_sections();
        let reply = self
            .provider
            .complete(&prompt::analysis_prompt(document_text, &required))
            .await?;
        Ok(parse_judgment(&reply))
    }

    /// Free-text comparison of the document against a stored template.
    ///
    /// Comparison is advisory; a failed call degrades to an explanatory
    /// string instead of failing the check.
    pub async fn compare_with_template(&self, template_text: &str, document_text: &str) -> String {
        match self
            .provider
            .complete(&prompt::comparison_prompt(template_text, document_text))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Template comparison unavailable: {}", e);
                format!("Perbandingan template tidak tersedia: {}", e)
            }
        }
    }
}
