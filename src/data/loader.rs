//! CSV Data Loader Module
//! Reads the order CSV with Polars, then derives the view-only columns.
//!
//! Loading is two steps: [`read_raw`] parses the file and checks the schema,
//! [`derive`] coerces `order_date` and computes `order_value`.

use super::RecordSet;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const ORDER_ID: &str = "order_id";
pub const CUSTOMER_NAME: &str = "customer_name";
pub const STATUS: &str = "status";
pub const CITY: &str = "city";
pub const ORDER_DATE: &str = "order_date";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const ORDER_VALUE: &str = "order_value";

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    ORDER_ID,
    CUSTOMER_NAME,
    STATUS,
    CITY,
    ORDER_DATE,
    QUANTITY,
    UNIT_PRICE,
];

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot open source {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        source: io::Error,
    },
    #[error("Source is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("Failed to load CSV: {0}")]
    Parse(#[from] PolarsError),
}

/// Load an order CSV: raw parse followed by column derivation.
pub fn load(path: &Path) -> Result<RecordSet, LoaderError> {
    debug!(path = %path.display(), "loading order source");
    let records = derive(read_raw(path)?)?;
    info!(
        path = %path.display(),
        rows = records.len(),
        columns = records.frame().width(),
        "loaded order source"
    );
    Ok(records)
}

/// Parse the CSV as-is and verify the required columns are present.
pub fn read_raw(path: &Path) -> Result<DataFrame, LoaderError> {
    // Polars reports a missing file as a bare I/O error; open it here so the
    // caller gets the path back.
    let unavailable = |source| LoaderError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };
    if !fs::metadata(path).map_err(unavailable)?.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    File::open(path).map_err(unavailable)?;

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    check_schema(&df)?;
    Ok(df)
}

/// Coerce `order_date` to a datetime column and (re)compute `order_value`.
///
/// Any `order_value` already present in the frame is replaced.
pub fn derive(mut df: DataFrame) -> Result<RecordSet, LoaderError> {
    let dates = parse_order_dates(df.column(ORDER_DATE)?)?;
    df.with_column(dates)?;

    let values = order_values(&df)?;
    df.with_column(values)?;

    Ok(RecordSet::new(df))
}

fn check_schema(df: &DataFrame) -> Result<(), LoaderError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.iter().any(|p| p == *name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoaderError::SchemaMismatch { missing })
    }
}

/// Unparsable or missing dates become null.
fn parse_order_dates(column: &Column) -> PolarsResult<Series> {
    let text = column.cast(&DataType::String)?;
    let millis = Int64Chunked::from_iter_options(
        ORDER_DATE.into(),
        text.str()?.into_iter().map(|raw| {
            raw.and_then(parse_order_date)
                .map(|dt| dt.and_utc().timestamp_millis())
        }),
    );

    millis
        .into_series()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

fn order_values(df: &DataFrame) -> PolarsResult<Series> {
    let quantity = df.column(QUANTITY)?.cast(&DataType::Float64)?;
    let unit_price = df.column(UNIT_PRICE)?.cast(&DataType::Float64)?;
    let values = quantity.f64()? * unit_price.f64()?;
    Ok(values.with_name(ORDER_VALUE.into()).into_series())
}

/// Parse a single date cell. Dates without a time are taken as midnight;
/// values with an offset are normalized to UTC.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
