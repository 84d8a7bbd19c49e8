use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::gateway::handlers;
use crate::gateway::state::AppState;

async fn health_check_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check_handler))
        .route("/healthz", get(health_check_handler))
        .route("/sub", get(handlers::sub::handle_sub))
        .route("/sub/*path", get(handlers::sub::handle_sub))
}
