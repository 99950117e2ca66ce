//! Trade — one executed buy or sell in a channel backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single executed trade.
///
/// `profit` is realized PnL net of fees and is present on sells only
/// (a buy has no realized outcome yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    /// Execution price (the channel price, not the bar extreme).
    pub price: f64,
    pub shares: u64,
    /// Gross notional: price * shares.
    pub amount: f64,
    pub fee: f64,
    pub profit: Option<f64>,
}

impl Trade {
    /// A winning trade is a sell with positive realized profit.
    pub fn is_winner(&self) -> bool {
        self.side == TradeSide::Sell && self.profit.map_or(false, |p| p > 0.0)
    }
}
