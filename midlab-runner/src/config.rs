//! Serializable run configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use midlab_core::engine::{AlertConfig, BacktestParams, EngineConfig};

use crate::optimizer::OptimizerGrid;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Everything needed to reproduce one analysis run: the instrument, the
/// engine parameters, the backtest parameters, the alert thresholds, and
/// an optional channel-width grid to sweep.
///
/// Loaded from TOML; every section is optional and falls back to the
/// engine defaults, so a minimal file is just `symbol = "..."`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Instrument the bar series belongs to.
    pub symbol: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub backtest: BacktestParams,

    #[serde(default)]
    pub alerts: AlertConfig,

    /// Channel-width grid for the optimizer; absent means no sweep.
    #[serde(default)]
    pub grid: Option<OptimizerGrid>,
}

impl RunConfig {
    /// Deterministic hash ID for this configuration.
    ///
    /// Two identical configs hash to the same RunId, so results keyed by
    /// RunId are shareable across runs.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: RunConfig = toml::from_str(s).context("parsing run config TOML")?;
        cfg.engine.validate().context("engine section")?;
        cfg.backtest.validate().context("backtest section")?;
        cfg.alerts.validate().context("alerts section")?;
        if let Some(grid) = &cfg.grid {
            grid.validate().context("grid section")?;
        }
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading run config {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
