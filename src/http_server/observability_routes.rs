//! Health and metrics routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::gate::GateState;
use crate::service::ContentService;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub authenticated: bool,
}

/// Create health and metrics routes
pub fn observability_routes(service: Arc<ContentService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(service)
}

async fn health_handler(State(service): State<Arc<ContentService>>) -> impl IntoResponse {
    let authenticated = matches!(service.ready().await, GateState::Authenticated(_));
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        authenticated,
    };

    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(service): State<Arc<ContentService>>) -> impl IntoResponse {
    (StatusCode::OK, Json(service.metrics()))
}
