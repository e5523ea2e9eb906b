use std::fmt;

use crate::backtest::{self, BacktestReport};
use crate::config::{LedgerConfig, DEFAULT_WATCHLIST};
use crate::generators::{round2, uniform, RandomSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "long" => Some(Self::Long),
            "short" => Some(Self::Short),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub direction: Direction,
    pub amount: f64,
    pub leverage: u32,
    pub open_price: f64,
    pub current_price: f64,
    pub trailing_stop: bool,
}

impl Position {
    pub fn floating_pnl(&self) -> f64 {
        let favorable_move = match self.direction {
            Direction::Long => self.current_price - self.open_price,
            Direction::Short => self.open_price - self.current_price,
        };

        favorable_move * f64::from(self.leverage) * self.amount / self.open_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    InvalidAmount,
    InvalidLeverage,
    UnknownSymbol,
    InsufficientFunds,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "order amount must be finite and positive"),
            Self::InvalidLeverage => write!(f, "leverage must be at least 1"),
            Self::UnknownSymbol => write!(f, "symbol is not on the watchlist"),
            Self::InsufficientFunds => write!(f, "order amount exceeds remaining capital"),
        }
    }
}

impl std::error::Error for OrderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseError {
    InvalidIndex,
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndex => write!(f, "no open position at that index"),
        }
    }
}

impl std::error::Error for CloseError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPosition {
    pub symbol: String,
    pub pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSummary {
    pub instruments: usize,
    pub positions: usize,
}

pub struct Ledger {
    config: LedgerConfig,
    balance: f64,
    realized_pnl: f64,
    instruments: Vec<Instrument>,
    positions: Vec<Position>,
    source: Box<dyn RandomSource>,
}

impl Ledger {
    pub fn new(config: LedgerConfig, source: Box<dyn RandomSource>) -> Self {
        assert!(
            config.starting_balance.is_finite() && config.starting_balance > 0.0,
            "starting balance must be finite and positive"
        );
        assert!(
            config.price_floor.is_finite() && config.price_floor > 0.0,
            "price floor must be finite and positive"
        );
        assert!(
            config.initial_price_min.is_finite()
                && config.initial_price_min >= config.price_floor,
            "initial price range must start at or above the price floor"
        );
        assert!(
            config.initial_price_max.is_finite()
                && config.initial_price_max >= config.initial_price_min,
            "initial price range must not be inverted"
        );
        assert!(
            config.max_refresh_step.is_finite() && config.max_refresh_step >= 0.0,
            "refresh step must be finite and non-negative"
        );

        Self {
            config,
            balance: config.starting_balance,
            realized_pnl: 0.0,
            instruments: Vec::new(),
            positions: Vec::new(),
            source,
        }
    }

    pub fn with_default_watchlist(config: LedgerConfig, source: Box<dyn RandomSource>) -> Self {
        let mut ledger = Self::new(config, source);
        for (symbol, name) in DEFAULT_WATCHLIST {
            let price = ledger.draw_initial_price();
            ledger.instruments.push(Instrument {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
            });
        }

        ledger
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn allocated_capital(&self) -> f64 {
        self.positions.iter().map(|position| position.amount).sum()
    }

    pub fn floating_pnl(&self) -> f64 {
        self.positions
            .iter()
            .map(Position::floating_pnl)
            .sum()
    }

    pub fn remaining_capital(&self) -> f64 {
        self.balance - self.allocated_capital()
    }

    pub fn add_instrument(&mut self, name_or_symbol: &str) -> bool {
        let input = name_or_symbol.trim();
        if input.is_empty() {
            return false;
        }

        let duplicate = self.instruments.iter().any(|instrument| {
            instrument.symbol.eq_ignore_ascii_case(input)
                || instrument.name.eq_ignore_ascii_case(input)
        });
        if duplicate {
            return false;
        }

        let price = self.draw_initial_price();
        self.instruments.push(Instrument {
            symbol: input.to_uppercase(),
            name: input.to_string(),
            price,
        });

        true
    }

    pub fn place_order(
        &mut self,
        symbol: &str,
        direction: Direction,
        amount: f64,
        leverage: u32,
        trailing_stop: bool,
    ) -> Result<usize, OrderError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(OrderError::InvalidAmount);
        }
        if leverage < 1 {
            return Err(OrderError::InvalidLeverage);
        }

        let instrument = self
            .instruments
            .iter()
            .find(|instrument| instrument.symbol.eq_ignore_ascii_case(symbol))
            .ok_or(OrderError::UnknownSymbol)?;
        let (symbol, name, open_price) = (
            instrument.symbol.clone(),
            instrument.name.clone(),
            instrument.price,
        );

        if amount > self.remaining_capital() {
            return Err(OrderError::InsufficientFunds);
        }

        self.positions.push(Position {
            symbol,
            name,
            direction,
            amount,
            leverage,
            open_price,
            current_price: open_price,
            trailing_stop,
        });

        Ok(self.positions.len() - 1)
    }

    pub fn refresh_prices(&mut self) -> RefreshSummary {
        let summary = RefreshSummary {
            instruments: self.instruments.len(),
            positions: self.positions.len(),
        };
        let step = self.config.max_refresh_step;
        let floor = self.config.price_floor;

        let Self {
            instruments,
            positions,
            source,
            ..
        } = self;
        for instrument in instruments.iter_mut() {
            instrument.price = stepped_price(source.as_mut(), instrument.price, step, floor);
        }
        for position in positions.iter_mut() {
            position.current_price =
                stepped_price(source.as_mut(), position.current_price, step, floor);
        }

        summary
    }

    pub fn close_position(&mut self, index: usize) -> Result<ClosedPosition, CloseError> {
        if index >= self.positions.len() {
            return Err(CloseError::InvalidIndex);
        }

        let position = self.positions.remove(index);
        let pnl = position.floating_pnl();
        self.realized_pnl += pnl;
        self.balance += pnl;

        Ok(ClosedPosition {
            symbol: position.symbol,
            pnl,
        })
    }

    pub fn run_backtest(&mut self, symbol: &str, days: u32) -> BacktestReport {
        backtest::simulate(self.source.as_mut(), symbol, days)
    }

    fn draw_initial_price(&mut self) -> f64 {
        let drawn = uniform(
            self.source.as_mut(),
            self.config.initial_price_min,
            self.config.initial_price_max,
        );

        round2(drawn).max(self.config.price_floor)
    }

    #[cfg(test)]
    pub(crate) fn set_position_price_for_test(&mut self, index: usize, price: f64) {
        self.positions[index].current_price = price;
    }
}

fn stepped_price(source: &mut dyn RandomSource, price: f64, max_step: f64, floor: f64) -> f64 {
    let delta = uniform(source, -max_step, max_step);

    round2(price + delta).max(floor)
}
