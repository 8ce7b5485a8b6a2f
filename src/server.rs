//! Local development proxy.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ProxyConfig;
use crate::dataset::{CardStore, FileStore};
use crate::routes;

/// State shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CardStore>,
    pub config: ProxyConfig,
}

impl AppState {
    pub fn new(store: impl CardStore + 'static, config: ProxyConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// State backed by the dataset file named in `config`.
    pub fn from_config(config: ProxyConfig) -> Self {
        let store = FileStore::new(config.dataset_path.clone());
        Self::new(store, config)
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .merge(routes::catalog::routes())
        .merge(routes::cards::routes())
        .merge(routes::assets::routes())
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origin == "*" {
        return layer.allow_origin(AllowOrigin::any());
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            warn!(origin, "Ignoring invalid CORS origin");
            layer
        }
    }
}

/// Binds the listener and serves until the process is stopped.
pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    info!(
        listen = %config.listen_addr,
        dataset = %config.dataset_path.display(),
        assets = %config.assets_dir.display(),
        "Starting card proxy"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    let app = create_router(AppState::from_config(config.clone()));
    info!("Server running on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
