//! MidLab Core — mid-price indicator engine, alerts, channel backtest.
//!
//! This crate contains the whole analysis engine:
//! - Domain types (bars, enriched bars, trades, position snapshots, alerts)
//! - Ingest: raw feed rows into a clean, date-ordered bar series
//! - Indicator kernels (rolling window, first-value-seeded EWMA)
//! - Staged enrichment pipeline (base fields, breakouts, enhanced
//!   amplitude and open/mid divergence, MPMI, star pattern)
//! - Alert generation over the latest bar
//! - Mid-price channel backtest with equity statistics
//! - Content fingerprints for reproducibility checks

pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
