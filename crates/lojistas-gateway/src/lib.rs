//! Lojistas Gateway - groups Google Shopping listings by seller over HTTP.

pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use lojistas_client::ListingProvider;
use lojistas_core::LinkMode;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, LinkModeArg};
pub use error::ApiError;

/// Shared, immutable state for every request.
pub struct AppState {
    pub provider: Arc<dyn ListingProvider>,
    pub link_mode: LinkMode,
}

impl AppState {
    pub fn new(provider: Arc<dyn ListingProvider>) -> Self {
        Self {
            provider,
            link_mode: LinkMode::default(),
        }
    }

    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/health", get(handlers::health_check))
        .route("/api/search-sellers", post(handlers::search_sellers))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
