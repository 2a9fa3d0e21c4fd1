//! HTTP route definitions.

pub mod category;
pub mod health;
pub mod helpers;
pub mod product;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::trace::TraceLayer;

use crate::middleware::enforce_rate_limit;
use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(category::router())
        .merge(product::router())
        .layer(from_fn_with_state(state.clone(), enforce_rate_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
