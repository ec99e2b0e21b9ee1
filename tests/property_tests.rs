//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Drawdown bounds: 0 <= maxDrawdown <= 1
//! 2. Determinism: identical inputs give identical results
//! 3. Flat strategy: HOLD everywhere keeps capital
//! 4. Non-negativity: cash and position never go below zero
//! 5. Causality: crossover signals ignore future bars

mod common;

use common::*;
use proptest::prelude::*;
use quantsim::domain::backtest::run_backtest;
use quantsim::domain::ma_crossover::MovingAverageCrossover;
use quantsim::domain::parameters::StrategyParameters;
use quantsim::domain::portfolio::Portfolio;
use quantsim::domain::signal::TradeSignal;
use quantsim::domain::strategy::SignalStrategy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Generators ───────────────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = Decimal> {
    (1u32..50_000u32).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn arb_closes() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_close(), 1..80)
}

fn arb_signal() -> impl Strategy<Value = TradeSignal> {
    prop_oneof![
        Just(TradeSignal::Buy),
        Just(TradeSignal::Sell),
        Just(TradeSignal::Hold),
    ]
}

fn arb_windows() -> impl Strategy<Value = (f64, f64)> {
    (1u32..10, 1u32..20).prop_map(|(short, gap)| (short as f64, (short + gap) as f64))
}

fn arb_capital() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

// ── 1. Drawdown bounds ───────────────────────────────────────────────

proptest! {
    #[test]
    fn drawdown_within_unit_interval(
        closes in arb_closes(),
        (short, long) in arb_windows(),
        capital in arb_capital(),
    ) {
        let bars = bars_from_closes("SPY", &closes);
        let result = run_backtest(
            &MovingAverageCrossover,
            capital,
            &bars,
            &crossover_params(short, long),
        ).unwrap();

        prop_assert!(result.max_drawdown() >= Decimal::ZERO);
        prop_assert!(result.max_drawdown() <= Decimal::ONE);
    }

    #[test]
    fn drawdown_bounds_hold_for_arbitrary_signals(
        closes in arb_closes(),
        signals in prop::collection::vec(arb_signal(), 0..80),
    ) {
        let bars = bars_from_closes("SPY", &closes);
        let result = run_backtest(
            &FixedSignals(signals),
            dec!(1000),
            &bars,
            &StrategyParameters::new(),
        ).unwrap();

        prop_assert!(result.max_drawdown() >= Decimal::ZERO);
        prop_assert!(result.max_drawdown() <= Decimal::ONE);
    }
}

// ── 2. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn identical_inputs_identical_results(
        closes in arb_closes(),
        (short, long) in arb_windows(),
        capital in arb_capital(),
    ) {
        let bars = bars_from_closes("SPY", &closes);
        let params = crossover_params(short, long);

        let first = run_backtest(&MovingAverageCrossover, capital, &bars, &params).unwrap();
        let second = run_backtest(&MovingAverageCrossover, capital, &bars, &params).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ── 3. Flat strategy ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn hold_only_keeps_capital(closes in arb_closes(), capital in arb_capital()) {
        let bars = bars_from_closes("SPY", &closes);
        let result = run_backtest(&AlwaysHold, capital, &bars, &StrategyParameters::new()).unwrap();

        prop_assert_eq!(result.final_capital(), result.initial_capital());
        prop_assert_eq!(result.total_pnl(), Decimal::ZERO);
        prop_assert_eq!(result.sharpe_ratio(), Decimal::ZERO);
        prop_assert_eq!(result.max_drawdown(), Decimal::ZERO);
    }
}

// ── 4. Non-negativity ────────────────────────────────────────────────

proptest! {
    #[test]
    fn ledger_never_negative(
        closes in arb_closes(),
        signals in prop::collection::vec(arb_signal(), 1..80),
        capital in arb_capital(),
    ) {
        let mut portfolio = Portfolio::new(capital);
        for (close, signal) in closes.iter().zip(signals.iter()) {
            portfolio.apply(*signal, *close).unwrap();
            prop_assert!(portfolio.cash >= Decimal::ZERO);
            prop_assert!(portfolio.position >= Decimal::ZERO);
            prop_assert!(portfolio.market_value(*close).unwrap() >= Decimal::ZERO);
        }
    }
}

// ── 5. Causality ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn signals_depend_only_on_past(
        closes in prop::collection::vec(arb_close(), 2..80),
        (short, long) in arb_windows(),
        cut in any::<prop::sample::Index>(),
    ) {
        let params = crossover_params(short, long);
        let full = MovingAverageCrossover
            .generate_signals(&bars_from_closes("SPY", &closes), &params)
            .unwrap();

        let prefix_len = cut.index(closes.len()) + 1;
        let prefix = MovingAverageCrossover
            .generate_signals(&bars_from_closes("SPY", &closes[..prefix_len]), &params)
            .unwrap();

        prop_assert_eq!(prefix.len(), prefix_len);
        prop_assert_eq!(&full[..prefix_len], &prefix[..]);
    }

    #[test]
    fn one_signal_per_bar(closes in arb_closes(), (short, long) in arb_windows()) {
        let bars = bars_from_closes("SPY", &closes);
        let signals = MovingAverageCrossover
            .generate_signals(&bars, &crossover_params(short, long))
            .unwrap();
        prop_assert_eq!(signals.len(), bars.len());
        prop_assert!(signals[..(long as usize - 1).min(bars.len())]
            .iter()
            .all(|s| *s == TradeSignal::Hold));
    }
}
