//! Technical indicator series over price bars.
//!
//! An `IndicatorSeries` is index-aligned with the bars it was computed from.

pub mod sma;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub valid: bool,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index`, or `None` while still warming up.
    pub fn value_at(&self, index: usize) -> Option<Decimal> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}
