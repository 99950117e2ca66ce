//! CSV bar loading for the runner.
//!
//! Reads a daily-bar CSV export, resolves columns by header name, and
//! hands the rows to `midlab_core::data::ingest` for validation and
//! ordering. Parsing is lenient at the field level: an unparsable price
//! becomes `None` and ingest decides whether the row survives. A row
//! with an unparsable date is dropped outright.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use midlab_core::data::{ingest, IngestError, RawRecord};
use midlab_core::domain::Bar;

/// Errors from the CSV loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Column indices resolved from the header row, case-insensitive.
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    amount: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
            amount: headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case("amount")),
        })
    }
}

/// Load a bar series from a CSV file.
///
/// Expects `date,open,high,low,close,volume` columns in any order (an
/// `amount` column is picked up when present, ignored otherwise). Column
/// names are matched case-insensitively. Returns the ingest result:
/// date-sorted sane bars, or an error when nothing usable survives.
pub fn load_bars_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let cols = Columns::resolve(reader.headers()?)?;

    let mut rows: Vec<RawRecord> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(date) = field(&record, cols.date).and_then(parse_date) else {
            continue;
        };
        rows.push(RawRecord {
            date,
            open: parse_field(&record, cols.open),
            high: parse_field(&record, cols.high),
            low: parse_field(&record, cols.low),
            close: parse_field(&record, cols.close),
            volume: field(&record, cols.volume).and_then(|s| s.parse::<u64>().ok()),
            amount: cols.amount.and_then(|i| parse_field(&record, i)),
        });
    }

    Ok(ingest(rows)?)
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> Option<&'a str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_field(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    field(record, idx).and_then(|s| s.parse::<f64>().ok())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // Feed exports use ISO dates; tolerate the slashed variant too.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}
