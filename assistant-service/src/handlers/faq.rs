//! Keyword FAQ lookups, answered locally without calling the provider.

use crate::startup::AppState;
use axum::{extract::State, Json};
use schedule_faq::FaqEntry;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

const MAX_QUERY_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct FaqQuery {
    #[serde(default)]
    pub query: String,
}

impl FaqQuery {
    fn validated(&self) -> Result<&str, AppError> {
        if self.query.chars().count() > MAX_QUERY_CHARS {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "query must be at most {} characters",
                MAX_QUERY_CHARS
            )));
        }
        Ok(&self.query)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub matched: bool,
    pub score: u32,
    pub entry: Option<FaqEntry>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub matched: bool,
    pub answer: Option<String>,
}

/// Best single entry for the query.
pub async fn search(
    State(state): State<AppState>,
    Json(query): Json<FaqQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let hit = state.faq.best_match(query.validated()?);
    tracing::debug!(matched = hit.is_some(), "FAQ search");

    Ok(Json(match hit {
        Some(hit) => SearchResponse {
            matched: true,
            score: hit.score,
            entry: Some(hit.entry.clone()),
        },
        None => SearchResponse {
            matched: false,
            score: 0,
            entry: None,
        },
    }))
}

/// Answer text, combining several entries for "all/every/each" questions.
pub async fn answer(
    State(state): State<AppState>,
    Json(query): Json<FaqQuery>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer = state.faq.lookup(query.validated()?);
    Ok(Json(AnswerResponse {
        matched: answer.is_some(),
        answer,
    }))
}
