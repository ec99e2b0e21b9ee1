//! Single-asset, all-in-or-flat portfolio state.

use rust_decimal::Decimal;
use std::fmt;

use super::error::QuantsimError;
use super::price_bar::div_scale;
use super::signal::TradeSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyHolding,
    NoCash,
    NonPositivePrice,
    NothingToSell,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::AlreadyHolding => write!(f, "already holding a position"),
            IgnoreReason::NoCash => write!(f, "no cash available"),
            IgnoreReason::NonPositivePrice => write!(f, "close price is not positive"),
            IgnoreReason::NothingToSell => write!(f, "no position to sell"),
        }
    }
}

/// What a signal did to the portfolio on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Held,
    Bought { quantity: Decimal },
    Sold { proceeds: Decimal },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub cash: Decimal,
    pub position: Decimal,
}

impl Portfolio {
    pub fn new(initial_capital: Decimal) -> Self {
        Portfolio {
            cash: initial_capital,
            position: Decimal::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_zero()
    }

    /// Apply one signal at the bar's closing price.
    ///
    /// BUY converts all cash into the asset (quantity rounded to four digits),
    /// SELL liquidates the whole position. Anything else leaves state untouched.
    /// A trade whose value leaves the Decimal range fails and leaves state untouched.
    pub fn apply(
        &mut self,
        signal: TradeSignal,
        close: Decimal,
    ) -> Result<SignalOutcome, QuantsimError> {
        match signal {
            TradeSignal::Hold => Ok(SignalOutcome::Held),
            TradeSignal::Buy => {
                if !self.is_flat() {
                    return Ok(SignalOutcome::Ignored(IgnoreReason::AlreadyHolding));
                }
                if self.cash <= Decimal::ZERO {
                    return Ok(SignalOutcome::Ignored(IgnoreReason::NoCash));
                }
                if close <= Decimal::ZERO {
                    return Ok(SignalOutcome::Ignored(IgnoreReason::NonPositivePrice));
                }
                let quantity = div_scale(self.cash, close)
                    .map_err(|_| QuantsimError::overflow(format!("buying at {close}")))?;
                self.position = quantity;
                self.cash = Decimal::ZERO;
                Ok(SignalOutcome::Bought { quantity })
            }
            TradeSignal::Sell => {
                if self.position <= Decimal::ZERO {
                    return Ok(SignalOutcome::Ignored(IgnoreReason::NothingToSell));
                }
                let proceeds = self
                    .position
                    .checked_mul(close)
                    .ok_or_else(|| QuantsimError::overflow(format!("selling at {close}")))?;
                self.cash = proceeds;
                self.position = Decimal::ZERO;
                Ok(SignalOutcome::Sold { proceeds })
            }
        }
    }

    /// Cash plus the position marked at `close`.
    pub fn market_value(&self, close: Decimal) -> Result<Decimal, QuantsimError> {
        self.position
            .checked_mul(close)
            .and_then(|held| self.cash.checked_add(held))
            .ok_or_else(|| QuantsimError::overflow(format!("marking to market at {close}")))
    }
}
