//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single instrument on a single trading day.
///
/// A series holds bars for exactly one instrument, so the bar itself
/// carries no symbol. `amount` is the optional turnover value reported
/// by the upstream feed; nothing in the engine requires it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub amount: Option<f64>,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: low <= {open, close} <= high, positive prices.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
            && self.high.is_finite()
            && self.low.is_finite()
            && self.open.is_finite()
            && self.close.is_finite()
    }

    /// Mid-price of the bar: (high + low) / 2.
    pub fn mid_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Signed turnover proxy: the bar's return applied to its turnover.
    /// Positive when the bar closed above its open; `None` when the feed
    /// reported no turnover.
    pub fn fund_flow_estimate(&self) -> Option<f64> {
        let amount = self.amount?;
        if self.open <= 0.0 || self.is_void() {
            return None;
        }
        Some((self.close - self.open) / self.open * amount)
    }
}
