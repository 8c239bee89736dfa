//! Direct question endpoint, bypassing the chat platform

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::SourceRef;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub context_used: usize,
    /// Chat-formatted rendering of the same answer.
    pub formatted: String,
    /// Whether any cache (fuzzy or persistent) supplied the answer.
    pub cached: bool,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    info!(query, "Ask request");
    let (payload, cached) = state.answer_with_persistence(query).await;

    Ok(Json(AskResponse {
        formatted: payload.format_for_chat(),
        answer: payload.answer,
        sources: payload.sources,
        context_used: payload.context_used,
        cached,
    }))
}
