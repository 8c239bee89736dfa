//! Prompt template management endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: &'static str,
    /// Whether the active template actually changed.
    pub changed: bool,
}

/// Re-read the template file and swap it in immediately, without waiting
/// for the watcher's next poll.
pub async fn reload(State(state): State<AppState>) -> Json<ReloadResponse> {
    let changed = state.prompt_loader.reload_into(&state.prompts);
    info!(changed, "Prompt reload requested");

    Json(ReloadResponse {
        status: "success",
        changed,
    })
}
