//! Cache inspection and invalidation endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{CacheStats, QaCacheStats};

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// In-memory fuzzy response cache.
    pub response_cache: CacheStats,
    /// Persistent exact-match cache, absent when disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa_cache: Option<QaCacheStats>,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<CacheStatsResponse>, ApiError> {
    let response_cache = state.pipeline.cache_stats().await;

    let qa_cache = match &state.qa_cache {
        Some(qa) => Some(qa.stats().await?),
        None => None,
    };

    Ok(Json(CacheStatsResponse {
        response_cache,
        qa_cache,
    }))
}

/// Clear both caches.
pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.pipeline.clear_cache().await;

    if let Some(qa) = &state.qa_cache {
        qa.clear().await?;
    }

    info!("Caches cleared");
    Ok(Json(json!({"status": "cleared"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::{passage, state_with};
    use crate::domain::generation::mock::MockGenerator;
    use crate::domain::retrieval::mock::MockSearchGateway;
    use crate::domain::QaCache;

    #[tokio::test]
    async fn test_stats_reports_both_caches() {
        let t = state_with(
            MockSearchGateway::new().with_results(vec![passage()]),
            MockGenerator::new("answer"),
        );
        t.state.answer_with_persistence("how to craft a sword").await;

        let response = stats(State(t.state)).await.unwrap().0;
        assert_eq!(response.response_cache.size, 1);
        assert_eq!(response.response_cache.capacity, 50);
        assert_eq!(response.qa_cache.unwrap().cached_answers, 1);
    }

    #[tokio::test]
    async fn test_clear_empties_both_caches() {
        let t = state_with(
            MockSearchGateway::new().with_results(vec![passage()]),
            MockGenerator::new("answer"),
        );
        t.state.answer_with_persistence("how to craft a sword").await;

        clear(State(t.state.clone())).await.unwrap();

        assert_eq!(t.state.pipeline.cache_stats().await.size, 0);
        assert_eq!(t.qa_cache.stats().await.unwrap().cached_answers, 0);
    }

    #[tokio::test]
    async fn test_stats_without_persistent_cache() {
        let mut t = state_with(MockSearchGateway::new(), MockGenerator::new("unused"));
        t.state.qa_cache = None;

        let response = stats(State(t.state)).await.unwrap();
        assert!(response.qa_cache.is_none());
    }
}
