//! Simple Moving Average over closing prices.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n, rounded to four digits half-up.
//! Each window is summed directly so no rounding carries between windows.
//! Warmup: first (n-1) bars are invalid.

use rust_decimal::Decimal;

use crate::domain::error::QuantsimError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries};
use crate::domain::price_bar::{div_scale, PriceBar};

pub fn calculate_sma(bars: &[PriceBar], period: usize) -> Result<IndicatorSeries, QuantsimError> {
    let warmup = period.saturating_sub(1);
    let divisor = Decimal::from(period.max(1));

    let values = (0..bars.len())
        .map(|i| -> Result<IndicatorPoint, QuantsimError> {
            if period == 0 || i < warmup {
                return Ok(IndicatorPoint {
                    valid: false,
                    value: Decimal::ZERO,
                });
            }
            let sum = bars[i + 1 - period..=i]
                .iter()
                .try_fold(Decimal::ZERO, |acc, bar| acc.checked_add(bar.close))
                .ok_or_else(|| QuantsimError::overflow(format!("summing SMA({period}) window")))?;
            Ok(IndicatorPoint {
                valid: true,
                value: div_scale(sum, divisor)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IndicatorSeries { values })
}
