//! Chat-completions client for the Groq endpoint.
//!
//! The endpoint speaks the OpenAI chat-completions wire format, so the
//! request and response shapes below are the standard ones. Temperature is
//! pinned to zero: judgments should be as repeatable as the model allows.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::JudgeError;
use crate::judge::TextCompletion;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama3-70b-8192";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// HTTP client for the model endpoint.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a client from `GROQ_API_KEY`, with `LLM_BASE_URL` and
    /// `LLM_MODEL` as optional overrides.
    pub fn from_env() -> Result<Self, JudgeError> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| JudgeError::MissingCredentials)?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            client.base_url = base_url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            client.model = model;
        }
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextCompletion for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(JudgeError::EmptyResponse)
    }
}
