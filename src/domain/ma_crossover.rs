//! Moving-average crossover strategy.
//!
//! BUY when the short SMA crosses above the long SMA, SELL when it crosses below.
//! A crossing needs a strict relation on the current bar that follows a
//! non-strict or opposite relation on the previous bar.

use std::cmp::Ordering;

use super::error::QuantsimError;
use super::indicator::sma::calculate_sma;
use super::parameters::StrategyParameters;
use super::price_bar::PriceBar;
use super::signal::TradeSignal;
use super::strategy::SignalStrategy;

pub const SHORT_WINDOW: &str = "shortWindow";
pub const LONG_WINDOW: &str = "longWindow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverWindows {
    pub short: usize,
    pub long: usize,
}

impl CrossoverWindows {
    pub fn from_parameters(parameters: &StrategyParameters) -> Result<Self, QuantsimError> {
        let short = parameters.window(SHORT_WINDOW)?;
        let long = parameters.window(LONG_WINDOW)?;
        if short >= long {
            return Err(QuantsimError::invalid_parameter(
                SHORT_WINDOW,
                format!("{SHORT_WINDOW} ({short}) must be less than {LONG_WINDOW} ({long})"),
            ));
        }
        Ok(Self { short, long })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MovingAverageCrossover;

impl MovingAverageCrossover {
    pub fn new() -> Self {
        Self
    }
}

impl SignalStrategy for MovingAverageCrossover {
    fn name(&self) -> &str {
        "MOVING_AVERAGE_CROSSOVER"
    }

    fn generate_signals(
        &self,
        bars: &[PriceBar],
        parameters: &StrategyParameters,
    ) -> Result<Vec<TradeSignal>, QuantsimError> {
        if bars.is_empty() {
            return Ok(Vec::new());
        }
        let windows = CrossoverWindows::from_parameters(parameters)?;

        let short_ma = calculate_sma(bars, windows.short)?;
        let long_ma = calculate_sma(bars, windows.long)?;

        let relation = |i: usize| -> Option<Ordering> {
            Some(short_ma.value_at(i)?.cmp(&long_ma.value_at(i)?))
        };

        let signals = (0..bars.len())
            .map(|i| {
                // At i == long - 1 both averages exist but there is no prior pair.
                if i < windows.long {
                    return TradeSignal::Hold;
                }
                match (relation(i - 1), relation(i)) {
                    (Some(prev), Some(Ordering::Greater)) if prev != Ordering::Greater => {
                        TradeSignal::Buy
                    }
                    (Some(prev), Some(Ordering::Less)) if prev != Ordering::Less => {
                        TradeSignal::Sell
                    }
                    _ => TradeSignal::Hold,
                }
            })
            .collect();

        Ok(signals)
    }

    fn validate_parameters(&self, parameters: &StrategyParameters) -> Result<(), QuantsimError> {
        CrossoverWindows::from_parameters(parameters).map(|_| ())
    }
}
