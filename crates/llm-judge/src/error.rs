use thiserror::Error;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("model returned no choices")]
    EmptyResponse,

    #[error("GROQ_API_KEY is not set")]
    MissingCredentials,
}
