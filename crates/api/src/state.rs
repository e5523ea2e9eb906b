use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use ledger::{
    CloseError, Direction, Instrument, Ledger, LedgerConfig, OrderError, Position,
    RefreshSummary, SeededRandomSource,
};

pub const MAX_LEVERAGE: u32 = 20;

const EVENT_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_PRICE_SEED: u64 = 17;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Long,
    Short,
}

impl OrderSide {
    fn direction(self) -> Direction {
        match self {
            Self::Long => Direction::Long,
            Self::Short => Direction::Short,
        }
    }

    fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Long => Self::Long,
            Direction::Short => Self::Short,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AccountView {
    pub balance: f64,
    pub allocated_capital: f64,
    pub floating_pnl: f64,
    pub remaining_capital: f64,
    pub realized_pnl: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InstrumentView {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PositionView {
    pub index: usize,
    pub symbol: String,
    pub name: String,
    pub side: OrderSide,
    pub amount: f64,
    pub leverage: u32,
    pub open_price: f64,
    pub current_price: f64,
    pub trailing_stop: bool,
    pub floating_pnl: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ClosedPositionView {
    pub symbol: String,
    pub pnl: f64,
    pub balance: f64,
    pub realized_pnl: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BacktestView {
    pub symbol: String,
    pub days: u32,
    pub total_pnl: f64,
    pub win_rate_pct: f64,
    pub max_drawdown_pct: f64,
    pub disclaimer: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PanelEvent {
    Connected,
    InstrumentAdded {
        symbol: String,
        name: String,
        price: f64,
    },
    OrderPlaced {
        symbol: String,
        side: OrderSide,
        amount: f64,
        leverage: u32,
    },
    PositionClosed {
        symbol: String,
        pnl: f64,
    },
    PricesRefreshed {
        instruments: usize,
        positions: usize,
    },
}

impl PanelEvent {
    pub fn connected() -> Self {
        Self::Connected
    }

    pub fn instrument_added(symbol: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self::InstrumentAdded {
            symbol: symbol.into(),
            name: name.into(),
            price,
        }
    }

    pub fn order_placed(
        symbol: impl Into<String>,
        side: OrderSide,
        amount: f64,
        leverage: u32,
    ) -> Self {
        Self::OrderPlaced {
            symbol: symbol.into(),
            side,
            amount,
            leverage,
        }
    }

    pub fn position_closed(symbol: impl Into<String>, pnl: f64) -> Self {
        Self::PositionClosed {
            symbol: symbol.into(),
            pnl,
        }
    }

    pub fn prices_refreshed(instruments: usize, positions: usize) -> Self {
        Self::PricesRefreshed {
            instruments,
            positions,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<Ledger>>,
    events_tx: broadcast::Sender<PanelEvent>,
}

impl Default for AppState {
    fn default() -> Self {
        let source = Box::new(SeededRandomSource::new(DEFAULT_PRICE_SEED));

        Self::with_ledger(Ledger::with_default_watchlist(LedgerConfig::default(), source))
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            events_tx,
        }
    }

    pub fn account(&self) -> AccountView {
        let ledger = self.lock();

        AccountView {
            balance: ledger.balance(),
            allocated_capital: ledger.allocated_capital(),
            floating_pnl: ledger.floating_pnl(),
            remaining_capital: ledger.remaining_capital(),
            realized_pnl: ledger.realized_pnl(),
        }
    }

    pub fn instruments(&self) -> Vec<InstrumentView> {
        self.lock().instruments().iter().map(instrument_view).collect()
    }

    pub fn positions(&self) -> Vec<PositionView> {
        self.lock()
            .positions()
            .iter()
            .enumerate()
            .map(|(index, position)| position_view(index, position))
            .collect()
    }

    pub fn add_instrument(&self, name_or_symbol: &str) -> Option<InstrumentView> {
        let mut ledger = self.lock();
        if !ledger.add_instrument(name_or_symbol) {
            return None;
        }
        let view = ledger.instruments().last().map(instrument_view)?;
        drop(ledger);

        tracing::info!(symbol = %view.symbol, price = view.price, "instrument added");
        let _ = self
            .events_tx
            .send(PanelEvent::instrument_added(&view.symbol, &view.name, view.price));

        Some(view)
    }

    pub fn place_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: f64,
        leverage: u32,
        trailing_stop: bool,
    ) -> Result<PositionView, OrderError> {
        // The 20x cap is a panel rule, not a ledger invariant.
        let leverage = leverage.clamp(1, MAX_LEVERAGE);

        let mut ledger = self.lock();
        let index = ledger.place_order(symbol, side.direction(), amount, leverage, trailing_stop)?;
        let view = position_view(index, &ledger.positions()[index]);
        drop(ledger);

        tracing::info!(
            symbol = %view.symbol,
            side = ?view.side,
            amount = view.amount,
            leverage = view.leverage,
            "order placed"
        );
        let _ = self.events_tx.send(PanelEvent::order_placed(
            &view.symbol,
            view.side,
            view.amount,
            view.leverage,
        ));

        Ok(view)
    }

    pub fn close_position(&self, index: usize) -> Result<ClosedPositionView, CloseError> {
        let mut ledger = self.lock();
        let closed = ledger.close_position(index)?;
        let view = ClosedPositionView {
            symbol: closed.symbol,
            pnl: closed.pnl,
            balance: ledger.balance(),
            realized_pnl: ledger.realized_pnl(),
        };
        drop(ledger);

        tracing::info!(symbol = %view.symbol, pnl = view.pnl, "position closed");
        let _ = self
            .events_tx
            .send(PanelEvent::position_closed(&view.symbol, view.pnl));

        Ok(view)
    }

    pub fn run_backtest(&self, symbol: &str, days: u32) -> BacktestView {
        let report = self.lock().run_backtest(symbol, days);

        BacktestView {
            symbol: report.symbol,
            days: report.days,
            total_pnl: report.total_pnl,
            win_rate_pct: report.win_rate_pct,
            max_drawdown_pct: report.max_drawdown_pct,
            disclaimer: report.disclaimer.to_string(),
        }
    }

    pub fn refresh_prices(&self) -> RefreshSummary {
        let summary = self.lock().refresh_prices();

        tracing::debug!(
            instruments = summary.instruments,
            positions = summary.positions,
            "prices refreshed"
        );
        let _ = self
            .events_tx
            .send(PanelEvent::prices_refreshed(summary.instruments, summary.positions));

        summary
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events_tx.subscribe()
    }

    pub fn publish_event(
        &self,
        event: PanelEvent,
    ) -> Result<usize, broadcast::error::SendError<PanelEvent>> {
        self.events_tx.send(event)
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // Ledger state is re-derivable demo state; a poisoned lock is not fatal.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn instrument_view(instrument: &Instrument) -> InstrumentView {
    InstrumentView {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        price: instrument.price,
    }
}

fn position_view(index: usize, position: &Position) -> PositionView {
    PositionView {
        index,
        symbol: position.symbol.clone(),
        name: position.name.clone(),
        side: OrderSide::from_direction(position.direction),
        amount: position.amount,
        leverage: position.leverage,
        open_price: position.open_price,
        current_price: position.current_price,
        trailing_stop: position.trailing_stop,
        floating_pnl: position.floating_pnl(),
    }
}
