//! HTTP route handlers for the local proxy.

pub mod assets;
pub mod cards;
pub mod catalog;
pub mod health;

use crate::dataset::CardStore;
use crate::error::StoreError;
use crate::server::AppState;

/// Runs a store read on the blocking pool. A task that panics or is
/// cancelled comes back as a store error.
pub(crate) async fn read_store<T, F>(state: &AppState, read: F) -> Result<T, StoreError>
where
    F: FnOnce(&dyn CardStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || read(store.as_ref()))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}
