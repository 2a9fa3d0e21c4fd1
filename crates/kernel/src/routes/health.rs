//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Report service and database liveness. The health route sits outside
/// `/v1` and is never rate limited.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let postgres = state.postgres_healthy().await;

    let status = if postgres {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if postgres { "ok" } else { "degraded" },
            "postgres": postgres,
        })),
    )
}
