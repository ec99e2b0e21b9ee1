//! Configuration validation and typed config construction.
//!
//! Validates all config fields before a backtest runs.

use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::domain::error::QuantsimError;
use crate::domain::parameters::StrategyParameters;
use crate::domain::registry::MOVING_AVERAGE_CROSSOVER;
use crate::domain::service::MIN_INITIAL_CAPITAL;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_TICKER: &str = "SPY";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Typed view of a backtest config file.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub csv_path: Option<String>,
    pub ticker: String,
    pub strategy: String,
    pub initial_capital: Decimal,
    pub parameters: StrategyParameters,
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    parse_initial_capital(config)?;
    validate_common(config)
}

/// Validate a config for `serve`. HTTP requests carry their own capital, so
/// `[backtest] initial_capital` is only checked when present.
pub fn validate_serve_config(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    if config.get_string("backtest", "initial_capital").is_some() {
        parse_initial_capital(config)?;
    }
    validate_common(config)
}

fn validate_common(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    validate_strategy_name(config)?;
    validate_ticker(config)?;
    validate_listen(config)?;
    validate_log_level(config)?;
    parse_parameters(config)?;
    Ok(())
}

/// Validate and build a [`BacktestConfig`].
pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, QuantsimError> {
    validate_backtest_config(config)?;
    Ok(BacktestConfig {
        csv_path: config
            .get_string("data", "csv_path")
            .filter(|s| !s.trim().is_empty()),
        ticker: config
            .get_string("data", "ticker")
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_TICKER.to_string()),
        strategy: config
            .get_string("backtest", "strategy")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| MOVING_AVERAGE_CROSSOVER.to_string()),
        initial_capital: parse_initial_capital(config)?,
        parameters: parse_parameters(config)?,
    })
}

pub fn log_level(config: &dyn ConfigPort) -> String {
    config
        .get_string("logging", "level")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn parse_initial_capital(config: &dyn ConfigPort) -> Result<Decimal, QuantsimError> {
    let raw = config
        .get_string("backtest", "initial_capital")
        .ok_or_else(|| QuantsimError::ConfigMissing {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
        })?;
    let value = Decimal::from_str(raw.trim()).map_err(|_| QuantsimError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "initial_capital".to_string(),
        reason: format!("'{}' is not a decimal number", raw),
    })?;
    if value < MIN_INITIAL_CAPITAL {
        return Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: format!("initial_capital must be at least {}", MIN_INITIAL_CAPITAL),
        });
    }
    Ok(value)
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    match config.get_string("backtest", "strategy") {
        Some(s) if s.trim().is_empty() => Err(QuantsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "strategy".to_string(),
            reason: "strategy cannot be blank".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    match config.get_string("data", "ticker") {
        Some(s) if s.trim().is_empty() => Err(QuantsimError::ConfigInvalid {
            section: "data".to_string(),
            key: "ticker".to_string(),
            reason: "ticker cannot be blank".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    match config.get_string("web", "listen") {
        Some(s) if s.trim().parse::<SocketAddr>().is_err() => Err(QuantsimError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: format!("'{}' is not a socket address", s),
        }),
        _ => Ok(()),
    }
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), QuantsimError> {
    match config.get_string("logging", "level") {
        Some(s) if !s.trim().is_empty() && s.trim().parse::<LevelFilter>().is_err() => {
            Err(QuantsimError::ConfigInvalid {
                section: "logging".to_string(),
                key: "level".to_string(),
                reason: format!("'{}' is not a log level", s),
            })
        }
        _ => Ok(()),
    }
}

fn parse_parameters(config: &dyn ConfigPort) -> Result<StrategyParameters, QuantsimError> {
    config
        .section_entries("parameters")
        .into_iter()
        .map(|(key, raw)| {
            let value: f64 = raw.trim().parse().map_err(|_| QuantsimError::ConfigInvalid {
                section: "parameters".to_string(),
                key: key.clone(),
                reason: format!("'{}' is not a number", raw),
            })?;
            Ok((key, value))
        })
        .collect()
}
