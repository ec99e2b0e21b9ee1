//! In-memory market data adapter.

use crate::domain::error::QuantsimError;
use crate::domain::price_bar::{ensure_ascending, PriceBar};
use crate::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe ticker -> series store. Series are stored sorted and frozen;
/// readers get their own copy, so a running backtest never sees a later save.
#[derive(Debug, Default)]
pub struct InMemoryDataAdapter {
    storage: RwLock<HashMap<String, Arc<[PriceBar]>>>,
}

impl InMemoryDataAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(ticker: &str) -> Option<String> {
        let trimmed = ticker.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_uppercase())
        }
    }

    fn snapshot(&self, key: &str) -> Option<Arc<[PriceBar]>> {
        let storage = self.storage.read().unwrap_or_else(|e| e.into_inner());
        storage.get(key).filter(|bars| !bars.is_empty()).cloned()
    }
}

impl DataPort for InMemoryDataAdapter {
    fn fetch_bars(&self, ticker: &str) -> Result<Vec<PriceBar>, QuantsimError> {
        Self::normalize(ticker)
            .and_then(|key| self.snapshot(&key))
            .map(|bars| bars.to_vec())
            .ok_or_else(|| QuantsimError::TickerNotFound {
                ticker: ticker.to_string(),
            })
    }

    fn save_bars(&self, ticker: &str, mut bars: Vec<PriceBar>) -> Result<(), QuantsimError> {
        let key = Self::normalize(ticker).ok_or_else(|| QuantsimError::InvalidSeries {
            ticker: ticker.to_string(),
            reason: "ticker cannot be blank".into(),
        })?;

        bars.sort_by_key(|b| b.date);
        ensure_ascending(&key, &bars)?;

        let mut storage = self.storage.write().unwrap_or_else(|e| e.into_inner());
        storage.insert(key, bars.into());
        Ok(())
    }

    fn has_ticker(&self, ticker: &str) -> bool {
        Self::normalize(ticker)
            .and_then(|key| self.snapshot(&key))
            .is_some()
    }

    fn list_tickers(&self) -> Vec<String> {
        let storage = self.storage.read().unwrap_or_else(|e| e.into_inner());
        let mut tickers: Vec<String> = storage
            .iter()
            .filter(|(_, bars)| !bars.is_empty())
            .map(|(ticker, _)| ticker.clone())
            .collect();
        tickers.sort();
        tickers
    }
}
