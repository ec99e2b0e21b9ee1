//! Strategy registry: identifier -> shared strategy instance.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::QuantsimError;
use super::ma_crossover::MovingAverageCrossover;
use super::strategy::SignalStrategy;

pub const MOVING_AVERAGE_CROSSOVER: &str = "MOVING_AVERAGE_CROSSOVER";

#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn SignalStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MOVING_AVERAGE_CROSSOVER, Arc::new(MovingAverageCrossover::new()));
        registry
    }

    pub fn register(&mut self, name: &str, strategy: Arc<dyn SignalStrategy>) {
        self.strategies.insert(name.to_string(), strategy);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn SignalStrategy>, QuantsimError> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| QuantsimError::UnknownStrategy {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}
