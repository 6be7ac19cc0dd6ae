use crate::error::ChatError;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

/// Forward a chat prompt through the budget gates. The body is taken raw so
/// the credential and cutoff gates answer before it is parsed.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ChatError> {
    let result = state.chat.handle_json(&body).await?;
    Ok(Json(result.payload))
}
