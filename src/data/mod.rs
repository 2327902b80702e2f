//! Data module - CSV loading, caching and filtering

mod cache;
mod filter;
mod loader;

pub use cache::SourceCache;
pub use filter::{distinct_values, filter, OrderQuery};
pub use loader::{load, LoaderError};
pub use loader::{CITY, CUSTOMER_NAME, ORDER_DATE, ORDER_ID, ORDER_VALUE, STATUS};

use polars::prelude::*;

/// An ordered, immutable set of order rows.
///
/// Wraps a Polars `DataFrame`; cloning shares the column buffers, so a cached
/// set can be handed to every query without copying data.
#[derive(Debug, Clone)]
pub struct RecordSet {
    df: DataFrame,
}

impl RecordSet {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get list of column names, in source order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Render every cell as display text, row by row. Nulls become empty strings.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        let columns = self.df.get_columns();
        (0..self.df.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|col| match col.get(i) {
                        Ok(AnyValue::Null) | Err(_) => String::new(),
                        Ok(AnyValue::String(s)) => s.to_string(),
                        Ok(val) => val.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}
