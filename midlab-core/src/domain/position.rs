//! PositionSnapshot — end-of-bar portfolio state in a channel backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Portfolio state recorded once per bar, close-marked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub date: NaiveDate,
    pub shares: u64,
    /// Free cash after the day's trading.
    pub capital: f64,
    /// Close price used to mark the position.
    pub close: f64,
    /// shares * close.
    pub position_value: f64,
    /// capital + position_value.
    pub total_value: f64,
}

impl PositionSnapshot {
    /// Equity identity: total_value must equal capital + shares * close.
    pub fn is_balanced(&self, epsilon: f64) -> bool {
        (self.total_value - (self.capital + self.shares as f64 * self.close)).abs() <= epsilon
    }
}
