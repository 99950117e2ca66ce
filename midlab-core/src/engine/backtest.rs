//! Mid-price channel backtest.
//!
//! A single-position long-only state machine over a bar series: buy when
//! the bar touches the lower channel band, sell when it touches the upper
//! band, with a proportional fee on both legs. The walk is strictly
//! causal: each bar's decision sees only that bar and the running state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, PositionSnapshot, Trade, TradeSide};
use crate::engine::config::ConfigError;
use crate::engine::stats::RunStats;

/// Channel backtest parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestParams {
    /// Sell band half-width above mid-price.
    pub upper_pct: f64,
    /// Buy band half-width below mid-price.
    pub lower_pct: f64,
    pub initial_capital: f64,
    /// Proportional fee applied to both buy and sell notional.
    pub fee_rate: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            upper_pct: 0.01,
            lower_pct: 0.01,
            initial_capital: 100_000.0,
            fee_rate: 0.0003,
        }
    }
}

impl BacktestParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital > 0.0) {
            return Err(ConfigError::NonPositiveValue {
                name: "initial_capital",
                value: self.initial_capital,
            });
        }
        for (name, value) in [
            ("upper_pct", self.upper_pct),
            ("lower_pct", self.lower_pct),
            ("fee_rate", self.fee_rate),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }
        Ok(())
    }
}

/// Everything one backtest run produces: the trade ledger, the per-bar
/// position history, and the summary numbers derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_value: f64,
    /// Percent return over the whole run.
    pub total_return: f64,
    /// Number of buy entries.
    pub total_trades: usize,
    pub win_trades: usize,
    pub loss_trades: usize,
    /// Winning round trips over closed round trips, in percent.
    pub win_rate: f64,
    pub trades: Vec<Trade>,
    pub positions: Vec<PositionSnapshot>,
    pub stats: RunStats,
}

/// Open long position carried between bars.
struct Holding {
    shares: u64,
    /// Entry notional including the buy fee; sell profit nets against it.
    cost_basis: f64,
}

/// Run the channel backtest over a bar series.
///
/// Empty input produces a flat result at the initial capital. A series
/// of one bar is still walked; nothing requires a minimum length.
pub fn run_channel_backtest(
    bars: &[Bar],
    params: &BacktestParams,
) -> Result<BacktestResult, ConfigError> {
    params.validate()?;

    let mut capital = params.initial_capital;
    let mut holding: Option<Holding> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut positions: Vec<PositionSnapshot> = Vec::with_capacity(bars.len());

    for bar in bars {
        if bar.is_void() {
            positions.push(snapshot(bar.date, &holding, capital, bar.close));
            continue;
        }
        let mid = bar.mid_price();
        let sell_price = mid * (1.0 + params.upper_pct);
        let buy_price = mid * (1.0 - params.lower_pct);

        // Sell leg takes priority, and a bar that touches both bands
        // only sells: the freed capital cannot re-enter until the next bar.
        let mut sold = false;
        if let Some(pos) = holding.take() {
            if bar.high >= sell_price {
                sold = true;
                let notional = pos.shares as f64 * sell_price;
                let fee = notional * params.fee_rate;
                let proceeds = notional - fee;
                capital += proceeds;
                trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Sell,
                    price: sell_price,
                    shares: pos.shares,
                    amount: notional,
                    fee,
                    profit: Some(proceeds - pos.cost_basis),
                });
            } else {
                holding = Some(pos);
            }
        }

        if !sold && holding.is_none() && bar.low <= buy_price && buy_price > 0.0 {
            let affordable = (capital / (buy_price * (1.0 + params.fee_rate))).floor();
            if affordable >= 1.0 {
                let shares = affordable as u64;
                let notional = shares as f64 * buy_price;
                let fee = notional * params.fee_rate;
                capital -= notional + fee;
                holding = Some(Holding {
                    shares,
                    cost_basis: notional + fee,
                });
                trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Buy,
                    price: buy_price,
                    shares,
                    amount: notional,
                    fee,
                    profit: None,
                });
            }
        }

        positions.push(snapshot(bar.date, &holding, capital, bar.close));
    }

    Ok(summarize(params, trades, positions))
}

fn snapshot(date: NaiveDate, holding: &Option<Holding>, capital: f64, close: f64) -> PositionSnapshot {
    let shares = holding.as_ref().map_or(0, |p| p.shares);
    let position_value = if shares > 0 { shares as f64 * close } else { 0.0 };
    PositionSnapshot {
        date,
        shares,
        capital,
        close,
        position_value,
        total_value: capital + position_value,
    }
}

fn summarize(
    params: &BacktestParams,
    trades: Vec<Trade>,
    positions: Vec<PositionSnapshot>,
) -> BacktestResult {
    let final_value = positions
        .last()
        .map_or(params.initial_capital, |p| p.total_value);
    let total_return = (final_value / params.initial_capital - 1.0) * 100.0;

    let total_trades = trades
        .iter()
        .filter(|t| t.side == TradeSide::Buy)
        .count();
    let win_trades = trades.iter().filter(|t| t.is_winner()).count();
    let loss_trades = trades
        .iter()
        .filter(|t| t.side == TradeSide::Sell && !t.is_winner())
        .count();
    let closed = win_trades + loss_trades;
    let win_rate = win_trades as f64 / closed.max(1) as f64 * 100.0;

    let equity: Vec<f64> = positions.iter().map(|p| p.total_value).collect();
    let stats = RunStats::from_equity_curve(&equity);

    BacktestResult {
        initial_capital: params.initial_capital,
        final_value,
        total_return,
        total_trades,
        win_trades,
        loss_trades,
        win_rate,
        trades,
        positions,
        stats,
    }
}
