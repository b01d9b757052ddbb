use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;

/// Dependency the readiness probe waits on.
#[async_trait]
pub trait ReadinessCheck: Send + Sync + 'static {
    /// Returns the failure reason when the dependency is unreachable.
    async fn check(&self) -> Result<(), String>;
}

/// Router for the probe listener, served apart from the main API.
pub fn create_probe_router(readiness: Arc<dyn ReadinessCheck>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(readiness)
}

async fn healthz() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn readyz(State(readiness): State<Arc<dyn ReadinessCheck>>) -> (StatusCode, Json<Value>) {
    match readiness.check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "not ready", "error": e })),
            )
        }
    }
}
