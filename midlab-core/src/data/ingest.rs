//! Series validator/normalizer.
//!
//! Raw rows arrive from upstream feeds possibly unordered and with missing
//! or unparseable fields (surfaced here as `None`). Policy: drop rows that
//! cannot be coerced into a sane bar, sort the survivors by date, and fail
//! the batch on duplicate dates or when nothing survives. Downstream stages
//! treat an empty `Vec<Bar>` as a valid no-op input; the `EmptySeries`
//! error exists so callers can distinguish "feed gave us nothing usable"
//! from "short but valid series".

use crate::domain::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// A raw row before validation. Numeric fields are `None` when the
/// upstream value was missing or failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
    pub amount: Option<f64>,
}

/// Errors from series ingest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("no usable rows after validation")]
    EmptySeries,

    #[error("duplicate date in series: {0}")]
    DuplicateDate(NaiveDate),
}

/// Validate and normalize raw rows into a date-sorted bar series.
///
/// Rows missing any of open/high/low/close/volume, carrying non-finite
/// prices, or violating the OHLC range invariant are dropped. The
/// surviving rows are stably sorted ascending by date.
pub fn ingest(rows: Vec<RawRecord>) -> Result<Vec<Bar>, IngestError> {
    let mut bars: Vec<Bar> = rows.into_iter().filter_map(coerce_row).collect();

    bars.sort_by_key(|b| b.date);

    if bars.is_empty() {
        return Err(IngestError::EmptySeries);
    }

    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(IngestError::DuplicateDate(pair[0].date));
        }
    }

    Ok(bars)
}

/// Coerce a single row into a sane bar, or drop it.
fn coerce_row(row: RawRecord) -> Option<Bar> {
    let bar = Bar {
        date: row.date,
        open: row.open?,
        high: row.high?,
        low: row.low?,
        close: row.close?,
        volume: row.volume?,
        amount: row.amount,
    };
    if bar.is_sane() {
        Some(bar)
    } else {
        None
    }
}
