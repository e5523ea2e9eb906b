use crate::generators::{round2, uniform, RandomSource};

pub const BACKTEST_DISCLAIMER: &str =
    "Simulated result generated from random data; not investment advice.";

const TOTAL_PNL_RANGE: f64 = 1_000.0;
const WIN_RATE_MIN_PCT: f64 = 50.0;
const WIN_RATE_MAX_PCT: f64 = 100.0;
const MAX_DRAWDOWN_MIN_PCT: f64 = -10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub symbol: String,
    pub days: u32,
    pub total_pnl: f64,
    pub win_rate_pct: f64,
    pub max_drawdown_pct: f64,
    pub disclaimer: &'static str,
}

pub fn simulate(source: &mut dyn RandomSource, symbol: &str, days: u32) -> BacktestReport {
    let total_pnl = round2(uniform(source, -TOTAL_PNL_RANGE, TOTAL_PNL_RANGE));
    let win_rate_pct = round2(uniform(source, WIN_RATE_MIN_PCT, WIN_RATE_MAX_PCT));
    let max_drawdown_pct = round2(uniform(source, MAX_DRAWDOWN_MIN_PCT, 0.0));

    BacktestReport {
        symbol: symbol.to_string(),
        days,
        total_pnl,
        win_rate_pct,
        max_drawdown_pct,
        disclaimer: BACKTEST_DISCLAIMER,
    }
}
