//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::read_store;
use crate::server::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dataset_readable: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let dataset_readable = read_store(&state, |store| store.snapshot().map(|_| ()))
        .await
        .is_ok();

    Json(HealthResponse {
        status: if dataset_readable { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_readable,
    })
}
