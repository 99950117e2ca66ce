//! Rolling window accumulator — ring buffer over the last `W` values.
//!
//! Maintains an incremental sum over the non-NaN values in the window, so
//! means are O(1) amortized. Standard deviation and order statistics (min,
//! max, percentiles) scan the window, which is O(W) per query and fine at
//! the small windows this engine uses (W <= 20).
//!
//! Two NaN policies coexist, matching how each statistic is consumed:
//! - *strict* (`mean_strict`, `sum_strict`): NaN if any window value is NaN
//!   — rolling means/sums over a series with undefined leading values.
//! - *lenient* (everything else): computed over the non-NaN subset, NaN
//!   only when the subset is empty — percentile/z-score statistics that
//!   skip undefined values.
//!
//! All queries return NaN until the window has received `W` pushes.

/// Fixed-capacity rolling window with incremental moments.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: Vec<f64>,
    cap: usize,
    head: usize,
    len: usize,
    valid_sum: f64,
    valid_count: usize,
}

impl RollingWindow {
    /// Creates a window of capacity `cap`. `cap` must be >= 1; the engine
    /// config layer rejects zero periods before any window is built.
    pub fn new(cap: usize) -> Self {
        debug_assert!(cap >= 1, "rolling window capacity must be >= 1");
        Self {
            buf: vec![f64::NAN; cap],
            cap,
            head: 0,
            len: 0,
            valid_sum: 0.0,
            valid_count: 0,
        }
    }

    /// Pushes a value, evicting the oldest once the window is full.
    pub fn push(&mut self, v: f64) {
        if self.len == self.cap {
            let old = self.buf[self.head];
            if !old.is_nan() {
                self.valid_sum -= old;
                self.valid_count -= 1;
            }
        } else {
            self.len += 1;
        }
        self.buf[self.head] = v;
        self.head = (self.head + 1) % self.cap;
        if !v.is_nan() {
            self.valid_sum += v;
            self.valid_count += 1;
        }
    }

    pub fn is_full(&self) -> bool {
        self.len == self.cap
    }

    /// Mean of the window; NaN unless full and free of NaN values.
    pub fn mean_strict(&self) -> f64 {
        if !self.is_full() || self.valid_count < self.cap {
            return f64::NAN;
        }
        self.valid_sum / self.cap as f64
    }

    /// Sum of the window; NaN unless full and free of NaN values.
    pub fn sum_strict(&self) -> f64 {
        if !self.is_full() || self.valid_count < self.cap {
            return f64::NAN;
        }
        self.valid_sum
    }

    /// Mean over the non-NaN subset; NaN if window not full or subset empty.
    pub fn mean(&self) -> f64 {
        if !self.is_full() || self.valid_count == 0 {
            return f64::NAN;
        }
        self.valid_sum / self.valid_count as f64
    }

    /// Sample standard deviation (ddof = 1) over the non-NaN subset.
    /// NaN if window not full or fewer than 2 valid values. A constant
    /// window reads as exactly 0.0, not a rounding residue.
    pub fn sample_std(&self) -> f64 {
        if !self.is_full() || self.valid_count < 2 {
            return f64::NAN;
        }
        let n = self.valid_count as f64;
        let mean = self.valid_values().sum::<f64>() / n;
        let dev_sq: f64 = self.valid_values().map(|v| (v - mean) * (v - mean)).sum();
        let var = dev_sq / (n - 1.0);
        if var <= f64::EPSILON * mean * mean {
            return 0.0;
        }
        var.sqrt()
    }

    /// Percentile rank of `x` within the window: fraction of non-NaN window
    /// values strictly less than `x`, scaled to 0..=100.
    pub fn percentile_rank(&self, x: f64) -> f64 {
        if !self.is_full() || self.valid_count == 0 || x.is_nan() {
            return f64::NAN;
        }
        let below = self.valid_values().filter(|&v| v < x).count();
        below as f64 / self.valid_count as f64 * 100.0
    }

    /// Percentile rank of the most recently pushed value against the other
    /// window members: fraction of them strictly less, scaled to 0..=100.
    /// The newest value itself is left out of the denominator, so a window
    /// maximum ranks at 100. NaN if the window is not full, the newest
    /// value is NaN, or no other valid member exists.
    pub fn percentile_rank_of_newest(&self) -> f64 {
        if !self.is_full() {
            return f64::NAN;
        }
        let newest = self.buf[(self.head + self.cap - 1) % self.cap];
        if newest.is_nan() || self.valid_count < 2 {
            return f64::NAN;
        }
        let below = self.valid_values().filter(|&v| v < newest).count();
        below as f64 / (self.valid_count - 1) as f64 * 100.0
    }

    /// The `p`-th percentile (0..=100) of the non-NaN window values, with
    /// linear interpolation between closest ranks.
    pub fn percentile(&self, p: f64) -> f64 {
        if !self.is_full() || self.valid_count == 0 {
            return f64::NAN;
        }
        let mut sorted: Vec<f64> = self.valid_values().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN filtered"));
        let n = sorted.len();
        if n == 1 {
            return sorted[0];
        }
        let rank = p / 100.0 * (n - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        if lo == hi {
            return sorted[lo];
        }
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }

    /// Minimum over the non-NaN window values.
    pub fn min(&self) -> f64 {
        if !self.is_full() || self.valid_count == 0 {
            return f64::NAN;
        }
        self.valid_values().fold(f64::INFINITY, f64::min)
    }

    /// Maximum over the non-NaN window values.
    pub fn max(&self) -> f64 {
        if !self.is_full() || self.valid_count == 0 {
            return f64::NAN;
        }
        self.valid_values().fold(f64::NEG_INFINITY, f64::max)
    }

    fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.buf[..self.len].iter().copied().filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn queries_are_nan_until_full() {
        let mut w = RollingWindow::new(3);
        w.push(1.0);
        w.push(2.0);
        assert!(w.mean().is_nan());
        assert!(w.mean_strict().is_nan());
        assert!(w.min().is_nan());
        w.push(3.0);
        assert_approx(w.mean(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn eviction_keeps_moments_consistent() {
        let mut w = RollingWindow::new(3);
        for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
            w.push(v);
        }
        // Window is now [30, 40, 50]
        assert_approx(w.mean_strict(), 40.0, DEFAULT_EPSILON);
        assert_approx(w.sum_strict(), 120.0, DEFAULT_EPSILON);
        assert_approx(w.min(), 30.0, DEFAULT_EPSILON);
        assert_approx(w.max(), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn strict_mean_rejects_nan_lenient_skips_it() {
        let mut w = RollingWindow::new(3);
        w.push(10.0);
        w.push(f64::NAN);
        w.push(20.0);
        assert!(w.mean_strict().is_nan());
        assert!(w.sum_strict().is_nan());
        assert_approx(w.mean(), 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sample_std_matches_two_point_case() {
        let mut w = RollingWindow::new(2);
        w.push(10.0);
        w.push(20.0);
        // Sample std of {10, 20} = sqrt(50) ≈ 7.0710678
        assert_approx(w.sample_std(), 50.0_f64.sqrt(), 1e-9);
    }

    #[test]
    fn std_is_nan_with_one_valid_value() {
        let mut w = RollingWindow::new(2);
        w.push(f64::NAN);
        w.push(10.0);
        assert!(w.sample_std().is_nan());
        assert_approx(w.mean(), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_window_std_is_exactly_zero() {
        // A value whose repeated sum rounds must still read as constant.
        let mut w = RollingWindow::new(20);
        for _ in 0..25 {
            w.push(1000.0 / 95.0);
        }
        assert_eq!(w.sample_std(), 0.0);
    }

    #[test]
    fn percentile_rank_counts_strictly_less() {
        let mut w = RollingWindow::new(4);
        for v in [1.0, 2.0, 3.0, 3.0] {
            w.push(v);
        }
        // Values strictly below 3.0: {1, 2} → 2/4 = 50%
        assert_approx(w.percentile_rank(3.0), 50.0, DEFAULT_EPSILON);
        assert_approx(w.percentile_rank(10.0), 100.0, DEFAULT_EPSILON);
        assert_approx(w.percentile_rank(0.5), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn newest_rank_excludes_itself_from_the_denominator() {
        let mut w = RollingWindow::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            w.push(v);
        }
        // 4.0 tops all three other members: 3/3 = 100.
        assert_approx(w.percentile_rank_of_newest(), 100.0, DEFAULT_EPSILON);
        w.push(0.5);
        // Window [2, 3, 4, 0.5]: nothing below the newest value.
        assert_approx(w.percentile_rank_of_newest(), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let mut w = RollingWindow::new(5);
        for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
            w.push(v);
        }
        assert_approx(w.percentile(50.0), 30.0, DEFAULT_EPSILON);
        assert_approx(w.percentile(0.0), 10.0, DEFAULT_EPSILON);
        assert_approx(w.percentile(100.0), 50.0, DEFAULT_EPSILON);
        // rank = 0.25 * 4 = 1.0 → exactly the second value
        assert_approx(w.percentile(25.0), 20.0, DEFAULT_EPSILON);
        // rank = 0.8 * 4 = 3.2 → 40 + 0.2 * 10 = 42
        assert_approx(w.percentile(80.0), 42.0, DEFAULT_EPSILON);
    }

    #[test]
    fn all_nan_window_yields_nan() {
        let mut w = RollingWindow::new(2);
        w.push(f64::NAN);
        w.push(f64::NAN);
        assert!(w.mean().is_nan());
        assert!(w.percentile(50.0).is_nan());
        assert!(w.percentile_rank(1.0).is_nan());
        assert!(w.min().is_nan());
    }
}
