//! Data ingest: raw row validation and series normalization.

pub mod ingest;

pub use ingest::{ingest, IngestError, RawRecord};
