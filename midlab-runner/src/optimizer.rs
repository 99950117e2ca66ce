//! Channel-width grid search.
//!
//! Sweeps the backtest over a grid of (upper_pct, lower_pct) pairs and
//! picks the pair with the highest total return. Evaluation order is
//! fixed (ascending upper, then ascending lower within each upper), and
//! the best-point scan is strictly greater-than, so ties resolve to the
//! earliest grid point regardless of parallelism.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use midlab_core::domain::Bar;
use midlab_core::engine::{run_channel_backtest, BacktestParams, ConfigError};

/// Backtests shorter than this are not worth sweeping; the optimizer
/// returns an empty report instead.
const MIN_BARS_FOR_SWEEP: usize = 10;

/// Inclusive arithmetic range of channel half-widths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PctRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl PctRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step > 0.0) {
            return Err(ConfigError::NonPositiveValue {
                name: "step",
                value: self.step,
            });
        }
        if !(self.start >= 0.0) {
            return Err(ConfigError::NegativeValue {
                name: "start",
                value: self.start,
            });
        }
        if !(self.stop >= self.start) {
            return Err(ConfigError::NegativeValue {
                name: "stop - start",
                value: self.stop - self.start,
            });
        }
        Ok(())
    }

    /// Materialize the range: start, start + step, ... up to and
    /// including stop (within a rounding tolerance of half a step).
    pub fn values(&self) -> Vec<f64> {
        let tolerance = self.step * 0.5;
        let count = ((self.stop - self.start) / self.step + 1.0 + 1e-9).floor() as usize;
        (0..count)
            .map(|i| self.start + i as f64 * self.step)
            .filter(|v| *v <= self.stop + tolerance)
            .collect()
    }
}

impl Default for PctRange {
    fn default() -> Self {
        Self {
            start: 0.005,
            stop: 0.03,
            step: 0.005,
        }
    }
}

/// The two channel-width axes of the sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerGrid {
    pub upper: PctRange,
    pub lower: PctRange,
}

impl OptimizerGrid {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upper.validate()?;
        self.lower.validate()
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridPoint {
    pub upper_pct: f64,
    pub lower_pct: f64,
    pub total_return: f64,
    pub total_trades: usize,
    pub win_rate: f64,
}

/// Outcome of a full sweep. `best` is `None` when the series was too
/// short to sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptimizationReport {
    pub best: Option<GridPoint>,
    /// Every evaluated point, in grid order.
    pub points: Vec<GridPoint>,
}

/// Grid-search driver over the channel backtest.
pub struct Optimizer {
    grid: OptimizerGrid,
    base: BacktestParams,
    parallel: bool,
}

impl Optimizer {
    /// Non-width parameters (capital, fee) come from `base`; its own
    /// `upper_pct`/`lower_pct` are overridden per grid point.
    pub fn new(grid: OptimizerGrid, base: BacktestParams) -> Self {
        Self {
            grid,
            base,
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sweep the grid over `bars`.
    ///
    /// Rayon only changes who evaluates which point; results are
    /// collected back in grid order, so the report is identical either
    /// way.
    pub fn optimize(&self, bars: &[Bar]) -> Result<OptimizationReport, ConfigError> {
        self.grid.validate()?;
        self.base.validate()?;
        if bars.len() < MIN_BARS_FOR_SWEEP {
            return Ok(OptimizationReport::default());
        }

        let pairs: Vec<(f64, f64)> = self
            .grid
            .upper
            .values()
            .into_iter()
            .flat_map(|u| self.grid.lower.values().into_iter().map(move |l| (u, l)))
            .collect();

        let evaluate = |&(upper_pct, lower_pct): &(f64, f64)| -> Result<GridPoint, ConfigError> {
            let params = BacktestParams {
                upper_pct,
                lower_pct,
                ..self.base
            };
            let result = run_channel_backtest(bars, &params)?;
            Ok(GridPoint {
                upper_pct,
                lower_pct,
                total_return: result.total_return,
                total_trades: result.total_trades,
                win_rate: result.win_rate,
            })
        };

        let points: Vec<GridPoint> = if self.parallel {
            pairs.par_iter().map(evaluate).collect::<Result<_, _>>()?
        } else {
            pairs.iter().map(evaluate).collect::<Result<_, _>>()?
        };

        let mut best: Option<GridPoint> = None;
        for point in &points {
            match best {
                Some(b) if point.total_return <= b.total_return => {}
                _ => best = Some(*point),
            }
        }

        Ok(OptimizationReport { best, points })
    }
}
