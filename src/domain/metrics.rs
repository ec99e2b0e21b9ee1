//! Performance metrics: running drawdown and Sharpe-ratio statistics.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::error::QuantsimError;
use super::price_bar::{div_scale, round_scale};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Tracks the running peak portfolio value and the largest fractional decline from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawdownTracker {
    peak: Decimal,
    max_drawdown: Decimal,
}

impl DrawdownTracker {
    pub fn new(initial_value: Decimal) -> Self {
        Self {
            peak: initial_value,
            max_drawdown: Decimal::ZERO,
        }
    }

    pub fn update(&mut self, value: Decimal) -> Result<(), QuantsimError> {
        if value > self.peak {
            self.peak = value;
        }
        if self.peak > Decimal::ZERO {
            let decline = self
                .peak
                .checked_sub(value)
                .ok_or_else(|| QuantsimError::overflow("computing drawdown"))?;
            let drawdown = div_scale(decline, self.peak)?;
            if drawdown > self.max_drawdown {
                self.max_drawdown = drawdown;
            }
        }
        Ok(())
    }

    pub fn peak(&self) -> Decimal {
        self.peak
    }

    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown
    }
}

/// Running count/mean/variance over daily returns (Welford's update).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl ReturnStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator); zero with fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Annualized Sharpe ratio, rounded to four digits.
    ///
    /// Zero with fewer than two samples or a zero standard deviation.
    pub fn sharpe_ratio(&self) -> Decimal {
        if self.count < 2 {
            return Decimal::ZERO;
        }
        let std_dev = self.std_dev();
        if std_dev == 0.0 {
            return Decimal::ZERO;
        }
        let sharpe = (self.mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt();
        Decimal::from_f64(sharpe)
            .map(round_scale)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Fractional change from `previous` to `current`, rounded to four digits.
///
/// `None` when `previous` is not positive.
pub fn daily_return(previous: Decimal, current: Decimal) -> Result<Option<Decimal>, QuantsimError> {
    if previous <= Decimal::ZERO {
        return Ok(None);
    }
    let change = current
        .checked_sub(previous)
        .ok_or_else(|| QuantsimError::overflow("computing daily return"))?;
    div_scale(change, previous).map(Some)
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn drawdown_tracks_peak_and_decline() {
        let mut tracker = DrawdownTracker::new(dec!(100));
        for value in [dec!(110), dec!(90), dec!(95), dec!(80), dec!(100)] {
            tracker.update(value).unwrap();
        }
        assert_eq!(tracker.peak(), dec!(110));
        // (110 - 80) / 110 = 0.272727...
        assert_eq!(tracker.max_drawdown(), dec!(0.2727));
    }

    #[test]
    fn drawdown_zero_when_rising() {
        let mut tracker = DrawdownTracker::new(dec!(100));
        for value in [dec!(100), dec!(101), dec!(150)] {
            tracker.update(value).unwrap();
        }
        assert_eq!(tracker.max_drawdown(), Decimal::ZERO);
    }

    #[test]
    fn drawdown_measured_from_initial_value() {
        let mut tracker = DrawdownTracker::new(dec!(1000));
        tracker.update(dec!(500)).unwrap();
        assert_eq!(tracker.max_drawdown(), dec!(0.5));
        assert_eq!(tracker.peak(), dec!(1000));
    }

    #[test]
    fn drawdown_skipped_for_zero_peak() {
        let mut tracker = DrawdownTracker::new(Decimal::ZERO);
        tracker.update(Decimal::ZERO).unwrap();
        assert_eq!(tracker.max_drawdown(), Decimal::ZERO);
    }

    #[test]
    fn stats_mean_and_sample_variance() {
        let mut stats = ReturnStats::new();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(v);
        }
        assert_eq!(stats.count(), 8);
        assert_relative_eq!(stats.mean(), 5.0, epsilon = 1e-12);
        // Sum of squared deviations = 32, n - 1 = 7
        assert_relative_eq!(stats.variance(), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn sharpe_zero_with_single_sample() {
        let mut stats = ReturnStats::new();
        stats.push(0.05);
        assert_eq!(stats.sharpe_ratio(), Decimal::ZERO);
    }

    #[test]
    fn sharpe_zero_for_constant_returns() {
        let mut stats = ReturnStats::new();
        for _ in 0..20 {
            stats.push(0.01);
        }
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.sharpe_ratio(), Decimal::ZERO);
    }

    #[test]
    fn sharpe_single_loss_among_flat_days() {
        let mut stats = ReturnStats::new();
        for i in 0..12 {
            stats.push(if i == 8 { -0.5 } else { 0.0 });
        }
        // mean = -1/24, sample std = sqrt(1/48), ratio * sqrt(252) = -4.58257...
        assert_eq!(stats.sharpe_ratio(), dec!(-4.5826));
    }

    #[test]
    fn daily_return_rounds_and_guards_zero() {
        assert_eq!(daily_return(dec!(1000), dec!(1166.6662)).unwrap(), Some(dec!(0.1667)));
        assert_eq!(daily_return(dec!(1000), dec!(1000)).unwrap(), Some(Decimal::ZERO));
        assert_eq!(daily_return(Decimal::ZERO, dec!(5)).unwrap(), None);
    }

    #[test]
    fn daily_return_overflow_is_an_error() {
        let err = daily_return(dec!(0.0001), Decimal::MAX).unwrap_err();
        assert!(matches!(err, QuantsimError::Overflow { .. }));
    }

    #[test]
    fn to_f64_converts() {
        assert_relative_eq!(to_f64(dec!(-0.0625)), -0.0625);
    }
}
