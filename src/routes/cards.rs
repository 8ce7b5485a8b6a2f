//! Card search endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error};

use super::read_store;
use crate::dataset::CatalogFilter;
use crate::error::AppError;
use crate::server::AppState;

/// Card routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/cards/search", get(search_cards))
}

/// All cards, or the cards whose `Catalog` equals the `Catalog` parameter.
/// A repeated `Catalog` matches nothing.
async fn search_cards(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let filter = CatalogFilter::from_values(
        params
            .into_iter()
            .filter(|(name, _)| name == "Catalog")
            .map(|(_, value)| value),
    );
    let wanted = filter.clone();
    let cards = read_store(&state, move |store| store.cards(&wanted))
        .await
        .map_err(|e| {
            error!(kind = %e.kind(), filter = ?filter, "Error fetching cards: {}", e);
            AppError::Internal("Failed to fetch cards")
        })?;
    debug!(filter = ?filter, count = cards.len(), "Serving cards");
    Ok(Json(cards))
}
