//! Signal strategy contract.

use super::error::QuantsimError;
use super::parameters::StrategyParameters;
use super::price_bar::PriceBar;
use super::signal::TradeSignal;

/// Turns a date-ascending price history into one signal per bar.
///
/// `signal[i]` may only depend on `bars[..=i]`. Implementations hold no mutable
/// state, so a single instance can serve concurrent backtests.
pub trait SignalStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn generate_signals(
        &self,
        bars: &[PriceBar],
        parameters: &StrategyParameters,
    ) -> Result<Vec<TradeSignal>, QuantsimError>;

    /// Check `parameters` without price data. Used for dry-run validation.
    fn validate_parameters(&self, _parameters: &StrategyParameters) -> Result<(), QuantsimError> {
        Ok(())
    }
}
