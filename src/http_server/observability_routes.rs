//! Observability HTTP Routes
//!
//! Liveness and readiness checks plus the root redirect to the front-end.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::storage::GradeStore;

/// Entry page of the bundled front-end
pub const FRONTEND_ENTRY: &str = "/static/index.html";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Static liveness check; touches no dependency
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
}

/// Readiness check that pings storage
pub fn ready_routes(store: Arc<dyn GradeStore>) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(store)
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn root_handler() -> Redirect {
    Redirect::temporary(FRONTEND_ENTRY)
}

async fn ready_handler(State(store): State<Arc<dyn GradeStore>>) -> impl IntoResponse {
    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready".to_string(),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "unavailable".to_string(),
                error: Some(e.to_string()),
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"healthy"}"#);
    }

    #[test]
    fn test_ready_response_omits_empty_error() {
        let response = ReadyResponse {
            status: "ready".to_string(),
            error: None,
        };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"status":"ready"}"#);
    }
}
