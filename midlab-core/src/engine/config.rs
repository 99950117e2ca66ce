//! Engine configuration — validated fail-fast before any computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid engine/backtest parameters. Raised before any bar is touched;
/// the engines never partially compute and then fail on configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got 0")]
    ZeroPeriod { name: &'static str },

    #[error("{name} must be positive, got {value}")]
    NonPositiveValue { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: f64 },

    #[error("percentile must be inside (0, 100), got {0}")]
    PercentileOutOfRange(f64),

    #[error("mpmi short span {short} must be less than long span {long}")]
    SpanOrder { short: usize, long: usize },
}

/// Parameters of the indicator engine.
///
/// Defaults reproduce the canonical enrichment: 5-day/2% breakout scan,
/// 10-day amplitude MA and ATR, 5-day open/mid MA, 20-day percentile
/// window with 20/50/80 bands, 12/26/9 MPMI spans, ±1% mid-price channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub breakout_window: usize,
    pub breakout_threshold: f64,
    pub amplitude_ma_period: usize,
    pub open_mid_ma_period: usize,
    /// Trailing window for percentile rank, bands and z-scores.
    pub window: usize,
    /// Percentile band levels, low/mid/high (defaults 20/50/80).
    pub percentiles: [f64; 3],
    pub mpmi_short_span: usize,
    pub mpmi_long_span: usize,
    pub mpmi_signal_span: usize,
    /// Channel half-widths used for the enriched `mid_upper`/`mid_lower`
    /// columns. The backtest carries its own independently tunable pair.
    pub channel_upper_pct: f64,
    pub channel_lower_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakout_window: 5,
            breakout_threshold: 0.02,
            amplitude_ma_period: 10,
            open_mid_ma_period: 5,
            window: 20,
            percentiles: [20.0, 50.0, 80.0],
            mpmi_short_span: 12,
            mpmi_long_span: 26,
            mpmi_signal_span: 9,
            channel_upper_pct: 0.01,
            channel_lower_pct: 0.01,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("breakout_window", self.breakout_window),
            ("amplitude_ma_period", self.amplitude_ma_period),
            ("open_mid_ma_period", self.open_mid_ma_period),
            ("window", self.window),
            ("mpmi_short_span", self.mpmi_short_span),
            ("mpmi_long_span", self.mpmi_long_span),
            ("mpmi_signal_span", self.mpmi_signal_span),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod { name });
            }
        }
        if self.mpmi_short_span >= self.mpmi_long_span {
            return Err(ConfigError::SpanOrder {
                short: self.mpmi_short_span,
                long: self.mpmi_long_span,
            });
        }
        if !(self.breakout_threshold > 0.0) {
            return Err(ConfigError::NonPositiveValue {
                name: "breakout_threshold",
                value: self.breakout_threshold,
            });
        }
        for p in self.percentiles {
            if !(p > 0.0 && p < 100.0) {
                return Err(ConfigError::PercentileOutOfRange(p));
            }
        }
        for (name, value) in [
            ("channel_upper_pct", self.channel_upper_pct),
            ("channel_lower_pct", self.channel_lower_pct),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }
        Ok(())
    }
}
