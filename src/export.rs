//! Results Export Module
//! Orders a record set for display and serializes it to CSV.
//!
//! The CSV uses the same layout the loader reads, so an export can be loaded
//! back as a source.

use crate::data::{RecordSet, ORDER_DATE, ORDER_ID};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Datetime layout written to exports; accepted by the loader.
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Newest orders first; orders without a date go last. Ties on the date are
/// broken by the larger `order_id` first.
pub fn present(records: &RecordSet) -> Result<RecordSet, ExportError> {
    let sorted = records.frame().sort(
        [ORDER_DATE, ORDER_ID],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?;
    Ok(RecordSet::new(sorted))
}

/// Serialize to CSV text with a header row. An empty set gives the header only.
pub fn serialize(records: &RecordSet) -> Result<String, ExportError> {
    let mut df = records.frame().clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_datetime_format(Some(EXPORT_DATETIME_FORMAT.to_string()))
        .finish(&mut df)?;
    Ok(String::from_utf8(buf)?)
}

/// Write the serialized records to `path`.
pub fn write_export(records: &RecordSet, path: &Path) -> Result<(), ExportError> {
    let csv = serialize(records)?;
    fs::write(path, csv).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = records.len(), "exported results");
    Ok(())
}
