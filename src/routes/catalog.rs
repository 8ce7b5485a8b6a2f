//! Catalog endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tracing::error;

use super::read_store;
use crate::error::AppError;
use crate::server::AppState;

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/catalog/hps", get(list_hps))
}

/// Every HP bucket in the dataset, as stored.
async fn list_hps(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let catalog = read_store(&state, |store| store.catalog())
        .await
        .map_err(|e| {
            error!(kind = %e.kind(), "Error fetching catalog: {}", e);
            AppError::Internal("Failed to fetch catalog")
        })?;
    Ok(Json(catalog))
}
