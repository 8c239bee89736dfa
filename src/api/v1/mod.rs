//! Direct question-answering API

pub mod ask;
pub mod cache;
pub mod prompt;

use axum::routing::{delete, get, post};
use axum::Router;

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/cache/stats", get(cache::stats))
        .route("/cache", delete(cache::clear))
        .route("/prompt/reload", post(prompt::reload))
}
