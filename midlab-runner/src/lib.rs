//! MidLab Runner — run configuration, CSV bar loading, grid search.
//!
//! Sits on top of `midlab-core`: resolves a run configuration, loads a
//! bar series from disk, and drives the enrichment/backtest engines,
//! including the parallel parameter sweep over channel widths.

pub mod config;
pub mod data_loader;
pub mod optimizer;

pub use config::{RunConfig, RunId};
pub use data_loader::{load_bars_csv, LoadError};
pub use optimizer::{GridPoint, OptimizationReport, Optimizer, OptimizerGrid, PctRange};
