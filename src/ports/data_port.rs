//! Market data access port trait.

use crate::domain::error::QuantsimError;
use crate::domain::price_bar::PriceBar;
use chrono::NaiveDate;

/// Ticker-keyed store of daily price series.
///
/// Tickers are case-insensitive. Series come back sorted ascending by date
/// with no duplicate dates.
pub trait DataPort {
    fn fetch_bars(&self, ticker: &str) -> Result<Vec<PriceBar>, QuantsimError>;

    /// Replace whatever is stored for `ticker`.
    fn save_bars(&self, ticker: &str, bars: Vec<PriceBar>) -> Result<(), QuantsimError>;

    fn has_ticker(&self, ticker: &str) -> bool;

    fn list_tickers(&self) -> Vec<String>;

    fn get_data_range(&self, ticker: &str) -> Option<(NaiveDate, NaiveDate, usize)> {
        let bars = self.fetch_bars(ticker).ok()?;
        let first = bars.first()?.date;
        let last = bars.last()?.date;
        Some((first, last, bars.len()))
    }
}
