//! Indicator enrichment pipeline: bar series in, enriched series out.
//!
//! Six stages run front-to-back over one `Vec<EnrichedBar>` accumulator,
//! in dependency order: base fields, breakout flags, enhanced amplitude,
//! enhanced open/mid divergence, MPMI, star pattern. Stages are isolated:
//! a NaN produced in one family (insufficient window, degenerate input)
//! never prevents another family from completing.
//!
//! Window convention: every `window`-sized rolling statistic uses the
//! trailing `W` bars ending at and including the current bar, so the field
//! is defined from index `W-1` onward. The breakout scan is the exception
//! and looks at the `window` bars strictly before the current one.

use crate::domain::{Bar, EnrichedBar, StarColor};
use crate::engine::config::{ConfigError, EngineConfig};
use crate::indicators::{ewma_first_seeded, RollingWindow};

/// Enrich a validated bar series with the full derived-indicator family.
///
/// An empty input yields an empty output; configuration is validated
/// before any bar is touched.
pub fn enrich(bars: &[Bar], cfg: &EngineConfig) -> Result<Vec<EnrichedBar>, ConfigError> {
    cfg.validate()?;

    let mut series: Vec<EnrichedBar> = bars.iter().cloned().map(EnrichedBar::from_bar).collect();
    if series.is_empty() {
        return Ok(series);
    }

    apply_base(&mut series, cfg.channel_upper_pct, cfg.channel_lower_pct);
    mark_breakouts(&mut series, cfg.breakout_window, cfg.breakout_threshold);
    enhance_amplitude(
        &mut series,
        cfg.amplitude_ma_period,
        cfg.window,
        &cfg.percentiles,
    );
    enhance_open_mid_diff(
        &mut series,
        cfg.open_mid_ma_period,
        cfg.window,
        &cfg.percentiles,
    );
    apply_mpmi(
        &mut series,
        cfg.mpmi_short_span,
        cfg.mpmi_long_span,
        cfg.mpmi_signal_span,
    );
    apply_star(&mut series);

    Ok(series)
}

/// Stage 1: O(1)-per-bar base fields.
fn apply_base(series: &mut [EnrichedBar], upper_pct: f64, lower_pct: f64) {
    let mut prev_close = f64::NAN;
    for eb in series.iter_mut() {
        let open = eb.bar.open;
        let high = eb.bar.high;
        let low = eb.bar.low;
        let mid = (high + low) / 2.0;

        eb.mid_price = mid;
        eb.amplitude = if low > 0.0 {
            (high - low) / low * 100.0
        } else {
            f64::NAN
        };
        eb.open_mid_diff = if mid != 0.0 {
            (mid - open) / mid * 100.0
        } else {
            f64::NAN
        };
        // Undefined on the first bar (no previous close).
        eb.rel_amplitude = if prev_close > 0.0 {
            (high - low) / prev_close * 100.0
        } else {
            f64::NAN
        };
        eb.mid_upper = mid * (1.0 + upper_pct);
        eb.mid_lower = mid * (1.0 - lower_pct);
        eb.fund_flow = eb.bar.fund_flow_estimate();

        prev_close = eb.bar.close;
    }
}

/// Stage 2: breakout flags against the trailing high/low envelope.
///
/// The envelope covers the `window` bars strictly before the current bar;
/// bars with fewer than `window` predecessors are never flagged.
fn mark_breakouts(series: &mut [EnrichedBar], window: usize, threshold: f64) {
    let mut highs = RollingWindow::new(window);
    let mut lows = RollingWindow::new(window);

    for eb in series.iter_mut() {
        if highs.is_full() {
            let hist_high = highs.max();
            let hist_low = lows.min();
            let close = eb.bar.close;
            // NaN comparisons are false, so a void bar is never flagged.
            eb.price_breakout =
                close > hist_high * (1.0 + threshold) || close < hist_low * (1.0 - threshold);
        }
        highs.push(eb.bar.high);
        lows.push(eb.bar.low);
    }
}

/// Stage 3: enhanced amplitude — rolling MA, true range/ATR, percentile
/// rank, bands and z-score.
fn enhance_amplitude(
    series: &mut [EnrichedBar],
    ma_period: usize,
    window: usize,
    percentiles: &[f64; 3],
) {
    // True range needs only the previous close; index 0 stays undefined.
    for i in 1..series.len() {
        let h = series[i].bar.high;
        let l = series[i].bar.low;
        let pc = series[i - 1].bar.close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        series[i].true_range = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    let mut ma_win = RollingWindow::new(ma_period);
    let mut atr_win = RollingWindow::new(ma_period);
    let mut pct_win = RollingWindow::new(window);
    let mut prev_atr = f64::NAN;

    for eb in series.iter_mut() {
        let amp = eb.amplitude;

        ma_win.push(amp);
        eb.amplitude_ma = ma_win.mean_strict();

        atr_win.push(eb.true_range);
        let atr = atr_win.mean_strict();
        eb.atr = atr;
        if !atr.is_nan() && !prev_atr.is_nan() && prev_atr != 0.0 {
            eb.atr_change = (atr / prev_atr - 1.0) * 100.0;
        }
        prev_atr = atr;

        pct_win.push(amp);
        eb.amplitude_percentile = pct_win.percentile_rank_of_newest();
        eb.amplitude_p20 = pct_win.percentile(percentiles[0]);
        eb.amplitude_p50 = pct_win.percentile(percentiles[1]);
        eb.amplitude_p80 = pct_win.percentile(percentiles[2]);

        let std = pct_win.sample_std();
        // Zero trailing std is a degenerate sample: undefined, not zero.
        eb.amplitude_zscore = if std > 0.0 {
            (amp - pct_win.mean()) / std
        } else {
            f64::NAN
        };
    }
}

/// Stage 4: enhanced open/mid divergence — same shape as stage 3 over
/// `open_mid_diff`, plus a trailing sum over `ma_period`.
fn enhance_open_mid_diff(
    series: &mut [EnrichedBar],
    ma_period: usize,
    window: usize,
    percentiles: &[f64; 3],
) {
    let mut ma_win = RollingWindow::new(ma_period);
    let mut pct_win = RollingWindow::new(window);

    for eb in series.iter_mut() {
        let diff = eb.open_mid_diff;

        ma_win.push(diff);
        eb.open_mid_diff_ma = ma_win.mean_strict();
        eb.open_mid_diff_cum = ma_win.sum_strict();

        pct_win.push(diff);
        eb.open_mid_diff_percentile = pct_win.percentile_rank_of_newest();
        eb.open_mid_diff_p20 = pct_win.percentile(percentiles[0]);
        eb.open_mid_diff_p50 = pct_win.percentile(percentiles[1]);
        eb.open_mid_diff_p80 = pct_win.percentile(percentiles[2]);

        let std = pct_win.sample_std();
        eb.open_mid_diff_zscore = if std > 0.0 {
            (diff - pct_win.mean()) / std
        } else {
            f64::NAN
        };
    }
}

/// Stage 5: MPMI — a MACD-shaped oscillator over mid-price.
///
/// EMAs are first-value seeded, so line/signal/hist are defined from the
/// first bar; cross flags need a predecessor and start at index 1.
fn apply_mpmi(series: &mut [EnrichedBar], short_span: usize, long_span: usize, signal_span: usize) {
    let mids: Vec<f64> = series.iter().map(|e| e.mid_price).collect();
    let ema_short = ewma_first_seeded(&mids, short_span);
    let ema_long = ewma_first_seeded(&mids, long_span);
    let line: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();
    let signal = ewma_first_seeded(&line, signal_span);

    for (i, eb) in series.iter_mut().enumerate() {
        eb.mpmi_line = line[i];
        eb.mpmi_signal = signal[i];
        eb.mpmi_hist = line[i] - signal[i];
        if i > 0 {
            eb.golden_cross = line[i] > signal[i] && line[i - 1] <= signal[i - 1];
            eb.death_cross = line[i] < signal[i] && line[i - 1] >= signal[i - 1];
        }
    }
}

/// Stage 6: three-day star pattern, flag attached to the third day.
///
/// Condition A: amplitude strictly shrinking across the triple.
/// Condition B: both later days' high/low inside the first day's range
/// (inclusive). Color follows the mid-price trend across the triple.
fn apply_star(series: &mut [EnrichedBar]) {
    for i in 2..series.len() {
        let a1 = series[i - 2].amplitude;
        let a2 = series[i - 1].amplitude;
        let a3 = series[i].amplitude;
        // NaN amplitude anywhere in the triple disqualifies it.
        if !(a1 > a2 && a2 > a3) {
            continue;
        }

        let high1 = series[i - 2].bar.high;
        let low1 = series[i - 2].bar.low;
        let within = |high: f64, low: f64| {
            low1 <= low && low <= high1 && low1 <= high && high <= high1
        };
        if !within(series[i - 1].bar.high, series[i - 1].bar.low)
            || !within(series[i].bar.high, series[i].bar.low)
        {
            continue;
        }

        let m1 = series[i - 2].mid_price;
        let m2 = series[i - 1].mid_price;
        let m3 = series[i].mid_price;
        series[i].star = Some(if m1 < m2 && m2 < m3 {
            StarColor::Red
        } else if m1 > m2 && m2 > m3 {
            StarColor::Green
        } else {
            StarColor::Yellow
        });
    }
}
