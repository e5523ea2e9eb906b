use axum::Json;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TradeSignal {
    pub symbol: &'static str,
    pub direction: &'static str,
    pub leverage: u32,
    pub amount: f64,
    pub entry: f64,
    pub tp: f64,
    pub sl: f64,
    pub reason: &'static str,
}

// Canned demo payload; the endpoint ignores whatever the caller sends.
pub fn demo_signal() -> TradeSignal {
    TradeSignal {
        symbol: "XAUUSD",
        direction: "long",
        leverage: 10,
        amount: 0.15,
        entry: 2_420.0,
        tp: 120.0,
        sl: 60.0,
        reason: "MACD+RSI setup confirmed",
    }
}

pub(crate) async fn trade_signal() -> Json<TradeSignal> {
    Json(demo_signal())
}
