//! Daily OHLCV price bar and series ordering checks.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::QuantsimError;

/// Fractional digits kept for every ledger value and reported metric.
pub const SCALE: u32 = 4;

/// Round to [`SCALE`] fractional digits, half away from zero.
///
/// The result always carries exactly [`SCALE`] digits, so `500` displays as `500.0000`.
pub fn round_scale(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

/// Divide and round the quotient to [`SCALE`] digits, half away from zero.
///
/// Callers guarantee a non-zero divisor. Fails if the quotient leaves the Decimal range.
pub fn div_scale(numerator: Decimal, denominator: Decimal) -> Result<Decimal, QuantsimError> {
    numerator
        .checked_div(denominator)
        .map(round_scale)
        .ok_or_else(|| QuantsimError::overflow(format!("dividing {numerator} by {denominator}")))
}

/// One day's price record for a ticker. Identity is `(ticker, date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub ticker: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Check that `bars` is strictly ascending by date (which also rules out duplicates).
pub fn ensure_ascending(ticker: &str, bars: &[PriceBar]) -> Result<(), QuantsimError> {
    for pair in bars.windows(2) {
        if pair[1].date == pair[0].date {
            return Err(QuantsimError::InvalidSeries {
                ticker: ticker.to_string(),
                reason: format!("duplicate date {}", pair[1].date),
            });
        }
        if pair[1].date < pair[0].date {
            return Err(QuantsimError::InvalidSeries {
                ticker: ticker.to_string(),
                reason: format!("{} follows {}", pair[1].date, pair[0].date),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ticker: "SPY".into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(1000),
        }
    }

    #[test]
    fn round_scale_is_half_up() {
        assert_eq!(round_scale(dec!(1.00005)), dec!(1.0001));
        assert_eq!(round_scale(dec!(1.00004)), dec!(1.0000));
        assert_eq!(round_scale(dec!(-1.00005)), dec!(-1.0001));
        assert_eq!(round_scale(dec!(2.00015)), dec!(2.0002));
    }

    #[test]
    fn div_scale_rounds_quotient() {
        assert_eq!(div_scale(dec!(1000), dec!(12)).unwrap(), dec!(83.3333));
        assert_eq!(div_scale(dec!(2), dec!(3)).unwrap(), dec!(0.6667));
        assert_eq!(div_scale(dec!(1000), dec!(20)).unwrap(), dec!(50));
    }

    #[test]
    fn div_scale_reports_overflow() {
        let err = div_scale(Decimal::MAX, dec!(0.0001)).unwrap_err();
        assert!(matches!(err, QuantsimError::Overflow { .. }));
    }

    #[test]
    fn ascending_series_is_accepted() {
        let bars = vec![bar(1, dec!(10)), bar(2, dec!(11)), bar(5, dec!(12))];
        assert!(ensure_ascending("SPY", &bars).is_ok());
        assert!(ensure_ascending("SPY", &[]).is_ok());
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let bars = vec![bar(1, dec!(10)), bar(1, dec!(11))];
        let err = ensure_ascending("SPY", &bars).unwrap_err();
        assert!(matches!(err, QuantsimError::InvalidSeries { .. }));
        assert!(err.to_string().contains("duplicate date 2024-01-01"));
    }

    #[test]
    fn descending_dates_are_rejected() {
        let bars = vec![bar(3, dec!(10)), bar(2, dec!(11))];
        assert!(ensure_ascending("SPY", &bars).is_err());
    }
}
