//! EnrichedBar — a bar plus every derived indicator field at a fixed schema.
//!
//! Undefined numeric fields (insufficient window, numeric degeneracy) are
//! `f64::NAN`, never zero. Event flags are plain bools; the star pattern is
//! an `Option<StarColor>`. The schema is fixed: every enrichment stage fills
//! its own fields and leaves the rest untouched.

use super::bar::Bar;
use serde::{Deserialize, Serialize};

/// Color of the three-day star pattern, classified by the mid-price trend
/// across the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarColor {
    /// Mid-price strictly rising across the three days.
    Red,
    /// Mid-price strictly falling across the three days.
    Green,
    /// Flat or non-monotonic mid-price.
    Yellow,
}

/// A bar enriched with the full derived-indicator family.
///
/// Every derived field at index `i` is a pure function of bars `0..=i` and
/// the engine parameters (strict causality, no look-ahead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: Bar,

    // ── Base fields (O(1) per bar) ──
    pub mid_price: f64,
    pub amplitude: f64,
    pub rel_amplitude: f64,
    pub open_mid_diff: f64,
    pub mid_upper: f64,
    pub mid_lower: f64,

    // ── Breakout ──
    pub price_breakout: bool,

    // ── Enhanced amplitude family ──
    pub amplitude_ma: f64,
    pub true_range: f64,
    pub atr: f64,
    pub atr_change: f64,
    pub amplitude_percentile: f64,
    /// Percentile bands at the configured percentiles (defaults 20/50/80).
    pub amplitude_p20: f64,
    pub amplitude_p50: f64,
    pub amplitude_p80: f64,
    pub amplitude_zscore: f64,

    // ── Enhanced open/mid divergence family ──
    pub open_mid_diff_ma: f64,
    pub open_mid_diff_cum: f64,
    pub open_mid_diff_percentile: f64,
    pub open_mid_diff_p20: f64,
    pub open_mid_diff_p50: f64,
    pub open_mid_diff_p80: f64,
    pub open_mid_diff_zscore: f64,

    // ── MPMI oscillator ──
    pub mpmi_line: f64,
    pub mpmi_signal: f64,
    pub mpmi_hist: f64,
    pub golden_cross: bool,
    pub death_cross: bool,

    // ── Patterns ──
    pub star: Option<StarColor>,

    // ── External collaborator data (merged upstream, optional) ──
    /// Main net fund inflow for the day, if the fund-flow feed supplied it.
    pub fund_flow: Option<f64>,
}

impl EnrichedBar {
    /// Wraps a bar with every derived field in its undefined state.
    pub fn from_bar(bar: Bar) -> Self {
        Self {
            bar,
            mid_price: f64::NAN,
            amplitude: f64::NAN,
            rel_amplitude: f64::NAN,
            open_mid_diff: f64::NAN,
            mid_upper: f64::NAN,
            mid_lower: f64::NAN,
            price_breakout: false,
            amplitude_ma: f64::NAN,
            true_range: f64::NAN,
            atr: f64::NAN,
            atr_change: f64::NAN,
            amplitude_percentile: f64::NAN,
            amplitude_p20: f64::NAN,
            amplitude_p50: f64::NAN,
            amplitude_p80: f64::NAN,
            amplitude_zscore: f64::NAN,
            open_mid_diff_ma: f64::NAN,
            open_mid_diff_cum: f64::NAN,
            open_mid_diff_percentile: f64::NAN,
            open_mid_diff_p20: f64::NAN,
            open_mid_diff_p50: f64::NAN,
            open_mid_diff_p80: f64::NAN,
            open_mid_diff_zscore: f64::NAN,
            mpmi_line: f64::NAN,
            mpmi_signal: f64::NAN,
            mpmi_hist: f64::NAN,
            golden_cross: false,
            death_cross: false,
            star: None,
            fund_flow: None,
        }
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.bar.date
    }
}
