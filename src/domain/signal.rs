//! Trade signals emitted by strategies, one per bar.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSignal::Buy => write!(f, "BUY"),
            TradeSignal::Sell => write!(f, "SELL"),
            TradeSignal::Hold => write!(f, "HOLD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_upper_case_names() {
        assert_eq!(TradeSignal::Buy.to_string(), "BUY");
        assert_eq!(TradeSignal::Sell.to_string(), "SELL");
        assert_eq!(TradeSignal::Hold.to_string(), "HOLD");
    }
}
