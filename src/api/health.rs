//! Health check endpoints for liveness and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::domain::QaCache as _;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check for orchestrator probes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness check reporting which optional components are wired up.
///
/// The bot stays ready without chat or the persistent cache; those only
/// degrade the response so operators can see what is missing.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::new();
    let mut overall = HealthStatus::Healthy;

    if state.chat.is_some() {
        checks.push(HealthCheck {
            name: "chat_client".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        });
    } else {
        overall = HealthStatus::Degraded;
        checks.push(HealthCheck {
            name: "chat_client".to_string(),
            status: HealthStatus::Degraded,
            message: Some("chat platform not configured".to_string()),
        });
    }

    match &state.qa_cache {
        Some(qa) => match qa.stats().await {
            Ok(_) => checks.push(HealthCheck {
                name: "qa_cache".to_string(),
                status: HealthStatus::Healthy,
                message: None,
            }),
            Err(e) => {
                overall = HealthStatus::Degraded;
                checks.push(HealthCheck {
                    name: "qa_cache".to_string(),
                    status: HealthStatus::Degraded,
                    message: Some(e.to_string()),
                });
            }
        },
        None => checks.push(HealthCheck {
            name: "qa_cache".to_string(),
            status: HealthStatus::Healthy,
            message: Some("disabled".to_string()),
        }),
    }

    let response = HealthResponse {
        status: overall,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
    };

    (StatusCode::OK, Json(response))
}
