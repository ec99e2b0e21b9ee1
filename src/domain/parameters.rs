//! Strategy parameter map.
//!
//! Values are plain numbers keyed by name; each strategy decides how to read them.

use std::collections::BTreeMap;

use super::error::QuantsimError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyParameters {
    values: BTreeMap<String, f64>,
}

impl StrategyParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Read a required positive window length.
    ///
    /// Fractional values are truncated toward zero before the positivity check.
    pub fn window(&self, name: &str) -> Result<usize, QuantsimError> {
        let value = self.get(name).ok_or_else(|| {
            QuantsimError::invalid_parameter(name, "missing required parameter")
        })?;
        if !value.is_finite() {
            return Err(QuantsimError::invalid_parameter(name, "must be a finite number"));
        }
        let truncated = value.trunc();
        if truncated <= 0.0 {
            return Err(QuantsimError::invalid_parameter(name, "must be positive"));
        }
        Ok(truncated as usize)
    }
}

impl FromIterator<(String, f64)> for StrategyParameters {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
