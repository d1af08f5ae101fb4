//! Reasoning service boundary
//!
//! The remote model is a black box: system + user prompt in, text out.
//! Anything that can answer that implements [`ReasoningService`].

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("FETCH/NETWORK: {0}")]
    Network(String),

    #[error("FETCH/AUTH: {0}")]
    Authentication(String),

    #[error("FETCH/RATE_LIMITED: {0}")]
    RateLimited(String),

    #[error("FETCH/UNAVAILABLE: {0}")]
    ServiceUnavailable(String),

    #[error("FETCH/API {status}: {message}")]
    Api { status: u16, message: String },

    #[error("PARSE/RESPONSE: {0}")]
    InvalidResponse(String),

    #[error("PROMPT/{0}")]
    Prompt(String),
}

impl ReasoningError {
    /// Quota, credit, or rate-limit exhaustion on the provider side
    pub fn is_quota(&self) -> bool {
        if matches!(self, ReasoningError::RateLimited(_)) {
            return true;
        }
        let message = self.to_string().to_lowercase();
        ["credits", "quota", "limit"].iter().any(|needle| message.contains(needle))
    }
}

impl From<reqwest::Error> for ReasoningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ReasoningError::InvalidResponse(err.to_string())
        } else {
            ReasoningError::Network(err.to_string())
        }
    }
}

/// A remote (or simulated) model that answers a prompt with text
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError>;
}
