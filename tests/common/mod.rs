#![allow(dead_code)]

use chrono::NaiveDate;
use quantsim::adapters::memory_adapter::InMemoryDataAdapter;
use quantsim::domain::error::QuantsimError;
use quantsim::domain::parameters::StrategyParameters;
pub use quantsim::domain::price_bar::PriceBar;
use quantsim::domain::signal::TradeSignal;
use quantsim::domain::strategy::SignalStrategy;
use quantsim::ports::data_port::DataPort;
use rust_decimal::Decimal;
use std::io::Write;

pub fn make_bar(ticker: &str, date: NaiveDate, close: Decimal) -> PriceBar {
    PriceBar {
        date,
        ticker: ticker.to_string(),
        open: close,
        high: close,
        low: close,
        close,
        volume: Decimal::from(1000),
    }
}

/// Consecutive daily bars starting 2024-01-01.
pub fn bars_from_closes(ticker: &str, closes: &[Decimal]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(ticker, start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn bars_from_ints(ticker: &str, closes: &[i64]) -> Vec<PriceBar> {
    let closes: Vec<Decimal> = closes.iter().map(|&c| Decimal::from(c)).collect();
    bars_from_closes(ticker, &closes)
}

pub fn crossover_params(short: f64, long: f64) -> StrategyParameters {
    StrategyParameters::new()
        .with("shortWindow", short)
        .with("longWindow", long)
}

pub fn store_with(ticker: &str, bars: Vec<PriceBar>) -> InMemoryDataAdapter {
    let store = InMemoryDataAdapter::new();
    store.save_bars(ticker, bars).unwrap();
    store
}

/// Emits a fixed signal list regardless of prices.
pub struct FixedSignals(pub Vec<TradeSignal>);

impl SignalStrategy for FixedSignals {
    fn name(&self) -> &str {
        "FIXED"
    }

    fn generate_signals(
        &self,
        _bars: &[PriceBar],
        _parameters: &StrategyParameters,
    ) -> Result<Vec<TradeSignal>, QuantsimError> {
        Ok(self.0.clone())
    }
}

/// Emits HOLD for every bar.
pub struct AlwaysHold;

impl SignalStrategy for AlwaysHold {
    fn name(&self) -> &str {
        "ALWAYS_HOLD"
    }

    fn generate_signals(
        &self,
        bars: &[PriceBar],
        _parameters: &StrategyParameters,
    ) -> Result<Vec<TradeSignal>, QuantsimError> {
        Ok(vec![TradeSignal::Hold; bars.len()])
    }
}

pub const CSV_HEADER: &str = "Date,Open,High,Low,Close,Volume\n";

pub fn csv_from_ints(closes: &[i64]) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut out = String::from(CSV_HEADER);
    for (i, c) in closes.iter().enumerate() {
        let date = start + chrono::Duration::days(i as i64);
        out.push_str(&format!("{date},{c},{c},{c},{c},1000\n"));
    }
    out
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
