//! Domain types: bars, enriched bars, trades, positions, alerts.

pub mod alert;
pub mod bar;
pub mod enriched;
pub mod position;
pub mod trade;

pub use alert::{Alert, AlertDirection, AlertKind, AlertLevel};
pub use bar::Bar;
pub use enriched::{EnrichedBar, StarColor};
pub use position::PositionSnapshot;
pub use trade::{Trade, TradeSide};
