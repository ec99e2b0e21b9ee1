//! Backtest engine: replays strategy signals day by day over one price series.

use rust_decimal::Decimal;

use super::error::QuantsimError;
use super::metrics::{daily_return, to_f64, DrawdownTracker, ReturnStats};
use super::parameters::StrategyParameters;
use super::portfolio::{Portfolio, SignalOutcome};
use super::price_bar::{round_scale, PriceBar};
use super::signal::TradeSignal;
use super::strategy::SignalStrategy;

/// Outcome of one backtest. Every field is rounded to four digits half-up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
#[cfg_attr(feature = "web", serde(rename_all = "camelCase"))]
pub struct BacktestResult {
    initial_capital: Decimal,
    final_capital: Decimal,
    #[cfg_attr(feature = "web", serde(rename = "totalPnL"))]
    total_pnl: Decimal,
    sharpe_ratio: Decimal,
    max_drawdown: Decimal,
}

impl BacktestResult {
    pub fn new(
        initial_capital: Decimal,
        final_capital: Decimal,
        total_pnl: Decimal,
        sharpe_ratio: Decimal,
        max_drawdown: Decimal,
    ) -> Self {
        Self {
            initial_capital: round_scale(initial_capital),
            final_capital: round_scale(final_capital),
            total_pnl: round_scale(total_pnl),
            sharpe_ratio: round_scale(sharpe_ratio),
            max_drawdown: round_scale(max_drawdown),
        }
    }

    /// Result for a run with no bars: capital untouched, all metrics zero.
    pub fn unchanged(initial_capital: Decimal) -> Self {
        Self::new(
            initial_capital,
            initial_capital,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn final_capital(&self) -> Decimal {
        self.final_capital
    }

    pub fn total_pnl(&self) -> Decimal {
        self.total_pnl
    }

    pub fn sharpe_ratio(&self) -> Decimal {
        self.sharpe_ratio
    }

    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown
    }
}

/// Run `strategy` over `bars` (date-ascending) starting from `initial_capital`.
///
/// Strategy errors propagate unchanged. The simulation fails only when a ledger
/// value leaves the Decimal range.
pub fn run_backtest(
    strategy: &dyn SignalStrategy,
    initial_capital: Decimal,
    bars: &[PriceBar],
    parameters: &StrategyParameters,
) -> Result<BacktestResult, QuantsimError> {
    let Some(last_bar) = bars.last() else {
        return Ok(BacktestResult::unchanged(initial_capital));
    };

    let signals = strategy.generate_signals(bars, parameters)?;

    let mut portfolio = Portfolio::new(initial_capital);
    let mut drawdown = DrawdownTracker::new(initial_capital);
    let mut returns = ReturnStats::new();
    let mut previous_value = initial_capital;

    for (i, bar) in bars.iter().enumerate() {
        let signal = signals.get(i).copied().unwrap_or(TradeSignal::Hold);

        match portfolio.apply(signal, bar.close)? {
            SignalOutcome::Ignored(reason) => {
                tracing::debug!(
                    index = i,
                    date = %bar.date,
                    %signal,
                    %reason,
                    "ignoring out-of-context signal"
                );
            }
            SignalOutcome::Bought { quantity } => {
                tracing::trace!(index = i, date = %bar.date, %quantity, close = %bar.close, "bought");
            }
            SignalOutcome::Sold { proceeds } => {
                tracing::trace!(index = i, date = %bar.date, %proceeds, close = %bar.close, "sold");
            }
            SignalOutcome::Held => {}
        }

        let value = portfolio.market_value(bar.close)?;
        drawdown.update(value)?;

        if let Some(r) = daily_return(previous_value, value)? {
            returns.push(to_f64(r));
        }
        previous_value = value;
    }

    let final_capital = portfolio.market_value(last_bar.close)?;
    let total_pnl = final_capital
        .checked_sub(initial_capital)
        .ok_or_else(|| QuantsimError::overflow("computing total PnL"))?;

    Ok(BacktestResult::new(
        initial_capital,
        final_capital,
        total_pnl,
        returns.sharpe_ratio(),
        drawdown.max_drawdown(),
    ))
}
