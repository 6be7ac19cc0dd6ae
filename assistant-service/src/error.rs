use crate::services::ledger::RejectReason;
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Every way a chat request can fail. None of these touch the usage ledger.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),

    #[error("Chat closed after {cutoff}")]
    ServiceRetired { cutoff: NaiveDate },

    #[error("Daily request limit ({limit}) reached")]
    RateLimited { limit: u32 },

    #[error("Daily budget limit (${limit:.2}) reached")]
    BudgetExceeded { limit: f64 },

    #[error("Provider request timed out")]
    Timeout,

    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Provider answered with a non-success status.
    #[error("API error: {status}")]
    Upstream { status: u16, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn from_rejection(reason: RejectReason, max_requests: u32, max_cost: f64) -> Self {
        match reason {
            RejectReason::RequestLimit => ChatError::RateLimited {
                limit: max_requests,
            },
            RejectReason::CostLimit => ChatError::BudgetExceeded { limit: max_cost },
        }
    }

    /// Label for `chat_requests_total{outcome}`.
    pub fn outcome(&self) -> &'static str {
        match self {
            ChatError::MissingApiKey => "missing_key",
            ChatError::InvalidRequest(_) => "invalid_request",
            ChatError::ServiceRetired { .. } => "retired",
            ChatError::RateLimited { .. } => "rate_limited",
            ChatError::BudgetExceeded { .. } => "budget_exceeded",
            ChatError::Timeout => "timeout",
            ChatError::Transport(_) => "transport",
            ChatError::Upstream { .. } => "upstream",
            ChatError::Internal(_) => "internal",
        }
    }
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(_) => ChatError::MissingApiKey,
            ProviderError::Timeout => ChatError::Timeout,
            ProviderError::NetworkError(message) => ChatError::Transport(message),
            ProviderError::ApiError { status, body } => ChatError::Upstream { status, body },
            ProviderError::InvalidResponse(message) => ChatError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match self {
            ChatError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key not configured".to_string(),
                Some("Please add your Anthropic API key to config.js".to_string()),
                None,
            ),
            ChatError::InvalidRequest(details) => (
                StatusCode::BAD_REQUEST,
                "Invalid request".to_string(),
                None,
                Some(details),
            ),
            ChatError::ServiceRetired { .. } => (
                StatusCode::FORBIDDEN,
                "Conference ended".to_string(),
                Some(
                    "The conference has ended. The chatbot is now sleeping after a great job!"
                        .to_string(),
                ),
                None,
            ),
            ChatError::RateLimited { limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Daily limit reached".to_string(),
                Some(format!(
                    "Daily request limit ({}) exceeded. This helps control costs.",
                    limit
                )),
                None,
            ),
            ChatError::BudgetExceeded { limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Budget limit reached".to_string(),
                Some(format!(
                    "Daily budget limit (${:.2}) exceeded. Come back tomorrow!",
                    limit
                )),
                None,
            ),
            ChatError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Request timeout".to_string(),
                Some("The AI provider did not answer in time. Please try again.".to_string()),
                None,
            ),
            ChatError::Transport(details) => (
                StatusCode::BAD_GATEWAY,
                "Upstream request failed".to_string(),
                None,
                Some(details),
            ),
            ChatError::Upstream { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("API error: {}", status),
                None,
                Some(body),
            ),
            ChatError::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
                Some(details),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                message,
                details,
            }),
        )
            .into_response()
    }
}
