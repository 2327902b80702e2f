//! Stats module - Summary metrics over a record set

mod summary;

pub use summary::{format_currency, summarize, Summary};
