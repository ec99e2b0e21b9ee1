//! HTTP request handlers for web adapter.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::Uri,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::backtest::BacktestResult;
use crate::domain::parameters::StrategyParameters;
use crate::domain::service::{BacktestRequest, BacktestService, MIN_INITIAL_CAPITAL};

use super::{AppState, WebError};

/// JSON body of `POST /api/v1/backtest`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestPayload {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub strategy_type: Option<String>,
    #[serde(default)]
    pub initial_capital: Option<Decimal>,
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, f64>>,
}

impl BacktestPayload {
    /// Check every field and report all failures at once as `field: message` pairs.
    pub fn into_request(self) -> Result<BacktestRequest, WebError> {
        let mut errors = Vec::new();

        let ticker = self.ticker.filter(|t| !t.trim().is_empty());
        if ticker.is_none() {
            errors.push("ticker: Ticker is required");
        }
        let strategy = self.strategy_type.filter(|s| !s.trim().is_empty());
        if strategy.is_none() {
            errors.push("strategyType: Strategy type is required");
        }
        match self.initial_capital {
            None => errors.push("initialCapital: Initial capital is required"),
            Some(c) if c < MIN_INITIAL_CAPITAL => {
                errors.push("initialCapital: Initial capital must be positive")
            }
            Some(_) => {}
        }

        match (ticker, strategy, self.initial_capital) {
            (Some(ticker), Some(strategy), Some(initial_capital)) if errors.is_empty() => {
                Ok(BacktestRequest {
                    ticker,
                    strategy,
                    initial_capital,
                    parameters: self
                        .parameters
                        .unwrap_or_default()
                        .into_iter()
                        .collect::<StrategyParameters>(),
                })
            }
            _ => Err(WebError::bad_request(errors.join("; "))),
        }
    }
}

pub async fn run_backtest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BacktestPayload>, JsonRejection>,
) -> Result<Json<BacktestResult>, WebError> {
    let Json(payload) = payload.map_err(|e| WebError::bad_request(e.body_text()))?;
    let request = payload.into_request()?;

    let result = tokio::task::spawn_blocking(move || {
        BacktestService::new(&*state.data_port, &state.registry).run(&request)
    })
    .await
    .map_err(|e| WebError::internal(format!("backtest task failed: {e}")))??;

    Ok(Json(result))
}

pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.registry.names())
}

pub async fn not_found(uri: Uri) -> WebError {
    WebError::not_found(format!("no route for {}", uri.path()))
}
