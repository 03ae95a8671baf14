//! schoolops-import library interface
//!
//! Exposes the import pipeline, the SQLite store and the HTTP router for
//! the binary and for integration tests.

pub mod api;
pub mod db;
pub mod error;
pub mod import;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::import::{ImportPipeline, ImportStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ImportPipeline<dyn ImportStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ImportStore>) -> Self {
        Self {
            pipeline: ImportPipeline::new(store),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::import_routes())
        .merge(api::health_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
