//! Equity-curve statistics for backtest results.
//!
//! Pure functions over a daily total-value series. Degenerate inputs
//! (empty, single point, zero variance) yield 0.0 rather than errors:
//! a report over too little data is a zero report, not a failure.

use serde::{Deserialize, Serialize};

/// Trading days per year, used to annualize the Sharpe ratio.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate backing the Sharpe excess-return calculation.
const RISK_FREE_RATE: f64 = 0.03;

/// Summary statistics of one equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Worst peak-to-trough decline, in percent (non-positive).
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio over the daily risk-free rate.
    pub sharpe_ratio: f64,
    /// Mean of the daily simple returns.
    pub avg_daily_return: f64,
    /// Sample standard deviation of the daily simple returns.
    pub volatility: f64,
}

impl RunStats {
    pub fn from_equity_curve(values: &[f64]) -> Self {
        let returns = daily_returns(values);
        Self {
            max_drawdown: max_drawdown_pct(values),
            sharpe_ratio: sharpe_ratio(&returns),
            avg_daily_return: mean(&returns),
            volatility: sample_std(&returns),
        }
    }
}

/// Simple daily returns: `v[i] / v[i-1] - 1`. One element shorter than
/// the input; a zero previous value contributes nothing.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Cumulative growth factors relative to the first value.
pub fn cumulative_returns(values: &[f64]) -> Vec<f64> {
    match values.first() {
        Some(&first) if first != 0.0 => values.iter().map(|v| v / first).collect(),
        _ => Vec::new(),
    }
}

/// Per-point drawdown from the running peak, in percent (non-positive).
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::MIN;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            if peak > 0.0 {
                (v / peak - 1.0) * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Worst drawdown in percent, 0.0 for flat or empty curves.
pub fn max_drawdown_pct(values: &[f64]) -> f64 {
    drawdowns(values)
        .into_iter()
        .fold(0.0, |worst, d| worst.min(d))
}

/// Annualized Sharpe ratio of a daily-return series.
///
/// Excess returns subtract the daily risk-free rate; a zero-variance
/// series scores 0.0.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let daily_rf = RISK_FREE_RATE / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let std = sample_std(&excess);
    if std == 0.0 {
        return 0.0;
    }
    TRADING_DAYS_PER_YEAR.sqrt() * mean(&excess) / std
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1); 0.0 below two points. A constant
/// series reads as exactly 0.0, not a rounding residue.
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64;
    if var <= f64::EPSILON * m * m {
        return 0.0;
    }
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn daily_returns_basic() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_approx(r[0], 0.10, DEFAULT_EPSILON);
        assert_approx(r[1], -0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn max_drawdown_of_monotone_rise_is_zero() {
        assert_approx(
            max_drawdown_pct(&[100.0, 110.0, 120.0]),
            0.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        // Peak 120, trough 90: (90/120 - 1) * 100 = -25%.
        let mdd = max_drawdown_pct(&[100.0, 120.0, 90.0, 110.0]);
        assert_approx(mdd, -25.0, DEFAULT_EPSILON);
    }

    #[test]
    fn drawdowns_track_running_peak() {
        let d = drawdowns(&[100.0, 120.0, 90.0, 130.0]);
        assert_approx(d[0], 0.0, DEFAULT_EPSILON);
        assert_approx(d[1], 0.0, DEFAULT_EPSILON);
        assert_approx(d[2], -25.0, DEFAULT_EPSILON);
        assert_approx(d[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sharpe_of_constant_returns_is_zero() {
        assert_approx(sharpe_ratio(&[0.001; 20]), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volatility_of_constant_returns_is_exactly_zero() {
        assert_eq!(sample_std(&[0.001; 20]), 0.0);
        assert_eq!(sample_std(&[1000.0 / 95.0; 7]), 0.0);
    }

    #[test]
    fn sharpe_positive_for_rising_noisy_curve() {
        let returns = [0.01, 0.02, -0.005, 0.015, 0.01, -0.002, 0.02];
        assert!(sharpe_ratio(&returns) > 0.0);
    }

    #[test]
    fn degenerate_inputs_score_zero() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[0.01]), 0.0);
        assert_eq!(max_drawdown_pct(&[]), 0.0);
        let stats = RunStats::from_equity_curve(&[]);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.avg_daily_return, 0.0);
    }

    #[test]
    fn cumulative_returns_relative_to_first() {
        let c = cumulative_returns(&[100.0, 110.0, 121.0]);
        assert_approx(c[0], 1.0, DEFAULT_EPSILON);
        assert_approx(c[1], 1.1, DEFAULT_EPSILON);
        assert_approx(c[2], 1.21, DEFAULT_EPSILON);
    }
}
