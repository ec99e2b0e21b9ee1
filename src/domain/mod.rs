//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod ma_crossover;
pub mod metrics;
pub mod parameters;
pub mod portfolio;
pub mod price_bar;
pub mod registry;
pub mod service;
pub mod signal;
pub mod strategy;
