//! Axum router for the liveness listener.
//!
//! Middleware: tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Read-only facts reported by `/health`, captured at startup.
#[derive(Debug, Clone)]
pub struct HealthState {
    pub commands: usize,
}

/// Build the health router.
pub fn build_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness check.
async fn health_check(State(state): State<HealthState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "commands": state.commands,
    }))
}
