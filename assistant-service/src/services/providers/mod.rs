//! Language-model provider abstraction.
//!
//! The chat proxy only needs one operation: send a prompt, get the provider's
//! JSON reply back untouched. Implementations map their transport failures
//! onto [`ProviderError`].

pub mod anthropic;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-success HTTP status; `body` is the raw response text.
    #[error("API error: {status}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a single user message and return the reply body as a JSON object.
    async fn complete(&self, prompt: &str) -> Result<Value, ProviderError>;

    /// Whether a usable credential is present.
    fn is_configured(&self) -> bool;
}
