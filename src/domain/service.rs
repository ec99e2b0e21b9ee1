//! Backtest service: resolves ticker data and strategy, then runs the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::backtest::{run_backtest, BacktestResult};
use super::error::QuantsimError;
use super::parameters::StrategyParameters;
use super::registry::StrategyRegistry;
use crate::ports::data_port::DataPort;

pub const MIN_INITIAL_CAPITAL: Decimal = dec!(0.01);

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRequest {
    pub ticker: String,
    pub strategy: String,
    pub initial_capital: Decimal,
    pub parameters: StrategyParameters,
}

pub struct BacktestService<'a> {
    data_port: &'a dyn DataPort,
    registry: &'a StrategyRegistry,
}

impl<'a> BacktestService<'a> {
    pub fn new(data_port: &'a dyn DataPort, registry: &'a StrategyRegistry) -> Self {
        Self {
            data_port,
            registry,
        }
    }

    pub fn run(&self, request: &BacktestRequest) -> Result<BacktestResult, QuantsimError> {
        if request.initial_capital < MIN_INITIAL_CAPITAL {
            return Err(QuantsimError::invalid_parameter(
                "initialCapital",
                format!("must be at least {MIN_INITIAL_CAPITAL}"),
            ));
        }

        let bars = self.data_port.fetch_bars(&request.ticker)?;
        let strategy = self.registry.get(&request.strategy)?;

        tracing::info!(
            ticker = %request.ticker,
            strategy = %request.strategy,
            bars = bars.len(),
            initial_capital = %request.initial_capital,
            "running backtest"
        );

        let result = run_backtest(
            strategy.as_ref(),
            request.initial_capital,
            &bars,
            &request.parameters,
        )?;

        tracing::info!(
            ticker = %request.ticker,
            final_capital = %result.final_capital(),
            total_pnl = %result.total_pnl(),
            sharpe_ratio = %result.sharpe_ratio(),
            max_drawdown = %result.max_drawdown(),
            "backtest complete"
        );

        Ok(result)
    }
}
