//! HTTP handlers for assistant-service.

pub mod chat;
pub mod faq;

use crate::services::UsageReport;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "api_key_configured": state.chat.provider_configured(),
    }))
}

pub async fn usage(State(state): State<AppState>) -> Json<UsageReport> {
    Json(state.chat.usage_report().await)
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
