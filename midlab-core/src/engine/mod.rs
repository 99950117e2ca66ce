//! Engines: enrichment, alerting, backtesting, and their configuration.

pub mod alerts;
pub mod backtest;
pub mod config;
pub mod enrich;
pub mod stats;

pub use alerts::{generate_alerts, AlertConfig};
pub use backtest::{run_channel_backtest, BacktestParams, BacktestResult};
pub use config::{ConfigError, EngineConfig};
pub use enrich::enrich;
pub use stats::RunStats;
