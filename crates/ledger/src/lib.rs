mod account;
mod backtest;
mod config;
mod generators;

pub use account::{
    CloseError, ClosedPosition, Direction, Instrument, Ledger, OrderError, Position,
    RefreshSummary,
};
pub use backtest::{BacktestReport, BACKTEST_DISCLAIMER};
pub use config::{LedgerConfig, DEFAULT_WATCHLIST};
pub use generators::{uniform, RandomSource, ScriptedRandomSource, SeededRandomSource};

pub fn workspace_bootstrap() -> bool {
    true
}
