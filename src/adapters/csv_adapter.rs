//! CSV price history loader.
//!
//! Expected layout: a header row starting with `Date`, then
//! `Date,Open,High,Low,Close,Volume` rows with ISO dates. Malformed rows are
//! skipped, not fatal.

use crate::domain::config_validation::DEFAULT_TICKER;
use crate::domain::error::QuantsimError;
use crate::domain::price_bar::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct CsvLoader {
    ticker: String,
}

impl CsvLoader {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PriceBar>, QuantsimError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| QuantsimError::DataLoad {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        self.load_reader(file)
    }

    pub fn load_reader<R: io::Read>(&self, reader: R) -> Result<Vec<PriceBar>, QuantsimError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = rdr.records();
        let header_ok = match records.next() {
            Some(Ok(header)) => header
                .get(0)
                .is_some_and(|h| h.to_lowercase().starts_with("date")),
            Some(Err(e)) if e.is_io_error() => {
                return Err(QuantsimError::DataLoad {
                    reason: format!("CSV read error: {}", e),
                });
            }
            _ => false,
        };
        if !header_ok {
            tracing::warn!(
                "CSV header missing or invalid, expected: Date,Open,High,Low,Close,Volume"
            );
            return Ok(Vec::new());
        }

        let mut bars = Vec::new();
        for (offset, result) in records.enumerate() {
            let line = offset + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    return Err(QuantsimError::DataLoad {
                        reason: format!("CSV read error at line {}: {}", line, e),
                    });
                }
                Err(e) => {
                    tracing::debug!(line, error = %e, "skipping unreadable CSV row");
                    continue;
                }
            };

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            match self.parse_row(&record) {
                Ok(bar) => bars.push(bar),
                Err(reason) => {
                    tracing::debug!(line, row = ?record, %reason, "skipping invalid CSV row");
                }
            }
        }

        Ok(bars)
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Result<PriceBar, String> {
        if record.len() < 6 {
            return Err(format!("expected 6 columns, found {}", record.len()));
        }

        let date = NaiveDate::parse_from_str(&record[0], "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{}': {}", &record[0], e))?;

        Ok(PriceBar {
            date,
            ticker: self.ticker.clone(),
            open: parse_decimal(&record[1], "open")?,
            high: parse_decimal(&record[2], "high")?,
            low: parse_decimal(&record[3], "low")?,
            close: parse_decimal(&record[4], "close")?,
            volume: parse_decimal(&record[5], "volume")?,
        })
    }

    /// Load `path` and store the rows in `port` under this loader's ticker.
    ///
    /// Returns the number of bars stored; nothing is stored when no row parsed.
    pub fn load_into<P: AsRef<Path>>(
        &self,
        port: &dyn DataPort,
        path: P,
    ) -> Result<usize, QuantsimError> {
        let path = path.as_ref();
        let bars = self.load_file(path)?;
        if bars.is_empty() {
            tracing::warn!(file = %path.display(), "no valid data rows found");
            return Ok(0);
        }
        let count = bars.len();
        port.save_bars(&self.ticker, bars)?;
        tracing::info!(
            rows = count,
            ticker = %self.ticker,
            file = %path.display(),
            "loaded market data"
        );
        Ok(count)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TICKER)
    }
}

fn parse_decimal(value: &str, column: &str) -> Result<Decimal, String> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| format!("invalid {} value '{}': {}", column, value, e))
}
