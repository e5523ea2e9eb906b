#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerConfig {
    pub starting_balance: f64,
    pub initial_price_min: f64,
    pub initial_price_max: f64,
    pub max_refresh_step: f64,
    pub price_floor: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            starting_balance: 50_000.0,
            initial_price_min: 100.0,
            initial_price_max: 400.0,
            max_refresh_step: 0.75,
            price_floor: 0.01,
        }
    }
}

pub const DEFAULT_WATCHLIST: [(&str, &str); 4] = [
    ("AAPL", "Apple"),
    ("TSLA", "Tesla"),
    ("XAUUSD", "Gold"),
    ("BTCUSD", "Bitcoin"),
];
