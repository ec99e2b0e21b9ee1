//! HTTP adapter: JSON API over the backtest service.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::registry::StrategyRegistry;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub registry: Arc<StrategyRegistry>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/backtest", post(handlers::run_backtest))
        .route("/api/v1/strategies", get(handlers::list_strategies))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
