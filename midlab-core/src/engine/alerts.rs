//! Alert generation over the latest bar of a series.
//!
//! Alerts are a point-in-time check, not a column: the latest bar is
//! compared against the `window` bars immediately before it, and zero or
//! more alerts come back. Series shorter than `window + 1` bars produce
//! no alerts at all.

use crate::domain::{Alert, AlertDirection, AlertKind, AlertLevel, Bar};
use crate::engine::config::ConfigError;
use crate::indicators::RollingWindow;
use serde::{Deserialize, Serialize};

/// Alert thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// Number of trailing bars (excluding the latest) each check compares
    /// against.
    pub window: usize,
    /// Percentile rank of the latest amplitude over the trailing window
    /// above which the bar counts as abnormal.
    pub amplitude_threshold_percentile: f64,
    /// Fractional margin beyond the trailing high/low for a breakout.
    pub price_change_threshold: f64,
    /// Absolute signed-turnover level for a fund-flow alert.
    pub fund_flow_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            window: 5,
            amplitude_threshold_percentile: 90.0,
            price_change_threshold: 0.02,
            fund_flow_threshold: 1_000_000.0,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroPeriod { name: "window" });
        }
        if !(self.price_change_threshold > 0.0) {
            return Err(ConfigError::NonPositiveValue {
                name: "price_change_threshold",
                value: self.price_change_threshold,
            });
        }
        let p = self.amplitude_threshold_percentile;
        if !(p > 0.0 && p < 100.0) {
            return Err(ConfigError::PercentileOutOfRange(p));
        }
        if !(self.fund_flow_threshold >= 0.0) {
            return Err(ConfigError::NegativeValue {
                name: "fund_flow_threshold",
                value: self.fund_flow_threshold,
            });
        }
        Ok(())
    }
}

/// Evaluate the latest bar of `bars` against the trailing window.
///
/// Returns every alert that fires, in a fixed order: price breakout,
/// abnormal amplitude, fund flow.
pub fn generate_alerts(bars: &[Bar], cfg: &AlertConfig) -> Result<Vec<Alert>, ConfigError> {
    cfg.validate()?;

    let mut alerts = Vec::new();
    if bars.len() < cfg.window + 1 {
        return Ok(alerts);
    }
    let latest = &bars[bars.len() - 1];
    if latest.is_void() {
        return Ok(alerts);
    }
    let trailing = &bars[bars.len() - 1 - cfg.window..bars.len() - 1];

    check_price_breakout(latest, trailing, cfg, &mut alerts);
    check_abnormal_amplitude(latest, trailing, cfg, &mut alerts);
    check_fund_flow(latest, cfg, &mut alerts);

    Ok(alerts)
}

fn check_price_breakout(latest: &Bar, trailing: &[Bar], cfg: &AlertConfig, out: &mut Vec<Alert>) {
    let hist_high = trailing.iter().map(|b| b.high).fold(f64::NAN, f64::max);
    let hist_low = trailing.iter().map(|b| b.low).fold(f64::NAN, f64::min);
    if hist_high.is_nan() || hist_low.is_nan() {
        return;
    }

    if latest.close > hist_high * (1.0 + cfg.price_change_threshold) {
        out.push(Alert {
            kind: AlertKind::PriceBreakout,
            direction: Some(AlertDirection::Up),
            date: latest.date,
            message: format!(
                "price breakout up: close {:.2} above {}-day high {:.2}",
                latest.close, cfg.window, hist_high
            ),
            level: AlertLevel::Warning,
        });
    } else if latest.close < hist_low * (1.0 - cfg.price_change_threshold) {
        out.push(Alert {
            kind: AlertKind::PriceBreakout,
            direction: Some(AlertDirection::Down),
            date: latest.date,
            message: format!(
                "price breakout down: close {:.2} below {}-day low {:.2}",
                latest.close, cfg.window, hist_low
            ),
            level: AlertLevel::Warning,
        });
    }
}

fn check_abnormal_amplitude(latest: &Bar, trailing: &[Bar], cfg: &AlertConfig, out: &mut Vec<Alert>) {
    if latest.low <= 0.0 {
        return;
    }
    let mut win = RollingWindow::new(trailing.len());
    for b in trailing {
        let amp = if b.low > 0.0 {
            (b.high - b.low) / b.low * 100.0
        } else {
            f64::NAN
        };
        win.push(amp);
    }
    let amplitude = (latest.high - latest.low) / latest.low * 100.0;
    let rank = win.percentile_rank(amplitude);
    if !rank.is_nan() && rank > cfg.amplitude_threshold_percentile {
        out.push(Alert {
            kind: AlertKind::AbnormalAmplitude,
            direction: None,
            date: latest.date,
            message: format!(
                "abnormal amplitude: {:.2}% ranks p{:.0} over the last {} days",
                amplitude, rank, cfg.window
            ),
            level: AlertLevel::Warning,
        });
    }
}

fn check_fund_flow(latest: &Bar, cfg: &AlertConfig, out: &mut Vec<Alert>) {
    let Some(flow) = latest.fund_flow_estimate() else {
        return;
    };
    if flow.abs() <= cfg.fund_flow_threshold {
        return;
    }
    // An outflow of this size is the more alarming of the two.
    let (direction, label, level) = if flow > 0.0 {
        (AlertDirection::Inflow, "inflow", AlertLevel::Info)
    } else {
        (AlertDirection::Outflow, "outflow", AlertLevel::Warning)
    };
    out.push(Alert {
        kind: AlertKind::FundFlow,
        direction: Some(direction),
        date: latest.date,
        message: format!("large fund {}: {:.0} beyond {:.0}", label, flow, cfg.fund_flow_threshold),
        level,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: i64, open: f64, high: f64, low: f64, close: f64, amount: Option<f64>) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(i),
            open,
            high,
            low,
            close,
            volume: 1000,
            amount,
        }
    }

    fn flat_series(n: i64) -> Vec<Bar> {
        (0..n)
            .map(|i| bar(i, 100.0, 101.0, 99.0, 100.0, None))
            .collect()
    }

    #[test]
    fn too_short_series_yields_no_alerts() {
        let bars = flat_series(5); // needs window + 1 = 6
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn upward_breakout_fires_at_threshold_margin() {
        // Trailing high 101; threshold 2% puts the trigger above 103.02.
        let mut bars = flat_series(5);
        bars.push(bar(5, 103.0, 104.0, 102.0, 103.5, None));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        let breakout: Vec<_> = alerts
            .iter()
            .filter(|a| a.kind == AlertKind::PriceBreakout)
            .collect();
        assert_eq!(breakout.len(), 1);
        assert_eq!(breakout[0].direction, Some(AlertDirection::Up));
        assert_eq!(breakout[0].level, AlertLevel::Warning);
    }

    #[test]
    fn close_inside_margin_does_not_fire() {
        // Close 103.0 is above the trailing high but within the 2% margin.
        let mut bars = flat_series(5);
        bars.push(bar(5, 102.0, 103.5, 101.0, 103.0, None));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        assert!(alerts.iter().all(|a| a.kind != AlertKind::PriceBreakout));
    }

    #[test]
    fn downward_breakout_fires() {
        // Trailing low 99; trigger below 97.02.
        let mut bars = flat_series(5);
        bars.push(bar(5, 98.0, 98.5, 96.0, 96.5, None));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        let breakout: Vec<_> = alerts
            .iter()
            .filter(|a| a.kind == AlertKind::PriceBreakout)
            .collect();
        assert_eq!(breakout.len(), 1);
        assert_eq!(breakout[0].direction, Some(AlertDirection::Down));
    }

    #[test]
    fn abnormal_amplitude_fires_on_wide_bar() {
        // Trailing amplitudes all ~2%; a 10% bar clears any percentile.
        let mut bars = flat_series(5);
        bars.push(bar(5, 100.0, 105.0, 95.0, 100.0, None));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        assert!(alerts
            .iter()
            .any(|a| a.kind == AlertKind::AbnormalAmplitude));
    }

    #[test]
    fn fund_flow_alert_requires_amount() {
        let mut bars = flat_series(5);
        // 5% up day on 100M turnover: flow ~ 5M, over the 1M default.
        bars.push(bar(5, 100.0, 106.0, 99.0, 105.0, Some(100_000_000.0)));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        let flow: Vec<_> = alerts
            .iter()
            .filter(|a| a.kind == AlertKind::FundFlow)
            .collect();
        assert_eq!(flow.len(), 1);
        assert_eq!(flow[0].direction, Some(AlertDirection::Inflow));

        // Same bar without turnover: no fund-flow alert.
        let mut bars = flat_series(5);
        bars.push(bar(5, 100.0, 106.0, 99.0, 105.0, None));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        assert!(alerts.iter().all(|a| a.kind != AlertKind::FundFlow));
    }

    #[test]
    fn down_day_triggers_outflow() {
        let mut bars = flat_series(5);
        bars.push(bar(5, 100.0, 101.0, 94.0, 95.0, Some(100_000_000.0)));
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        let flow: Vec<_> = alerts
            .iter()
            .filter(|a| a.kind == AlertKind::FundFlow)
            .collect();
        assert_eq!(flow.len(), 1);
        assert_eq!(flow[0].direction, Some(AlertDirection::Outflow));
    }

    #[test]
    fn quiet_latest_bar_yields_no_alerts() {
        let bars = flat_series(10);
        let alerts = generate_alerts(&bars, &AlertConfig::default()).unwrap();
        assert!(alerts.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = AlertConfig {
            amplitude_threshold_percentile: 100.0,
            ..Default::default()
        };
        assert!(generate_alerts(&flat_series(10), &cfg).is_err());
    }
}
