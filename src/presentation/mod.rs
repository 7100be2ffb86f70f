// Presentation layer - HTTP routing and handlers
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    acquire_reading, current_reading, health_check, history, history_point, store_credential,
    submit_manual_reading,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/reading", get(acquire_reading))
        .route("/api/reading/current", get(current_reading))
        .route("/api/reading/manual", post(submit_manual_reading))
        .route("/api/credential", put(store_credential))
        .route("/api/history", get(history))
        .route("/api/history/point", get(history_point))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
