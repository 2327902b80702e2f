//! Filter Engine Module
//! Narrows a record set by customer name, status and city.

use super::loader::{CITY, CUSTOMER_NAME, STATUS};
use super::RecordSet;
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One user search: free-text name match plus optional status and city sets.
///
/// Empty text and empty sets place no restriction on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub text: String,
    pub statuses: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl OrderQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = cities.into_iter().map(Into::into).collect();
        self
    }
}

/// Keep the rows matching every part of `query`, in their original order.
///
/// The name test is a case-insensitive substring match against the trimmed
/// query text. Rows without a name never match a non-empty query.
pub fn filter(records: &RecordSet, query: &OrderQuery) -> Result<RecordSet, FilterError> {
    let df = records.frame();
    let needle = query.text.trim().to_lowercase();

    let names = text_column(df, CUSTOMER_NAME)?;
    let statuses = text_column(df, STATUS)?;
    let cities = text_column(df, CITY)?;

    let mask: BooleanChunked = names
        .str()?
        .into_iter()
        .zip(statuses.str()?.into_iter())
        .zip(cities.str()?.into_iter())
        .map(|((name, status), city)| {
            name_matches(name, &needle)
                && member_of(status, &query.statuses)
                && member_of(city, &query.cities)
        })
        .collect();

    let filtered = df.filter(&mask)?;
    debug!(
        query = %needle,
        statuses = query.statuses.len(),
        cities = query.cities.len(),
        matched = filtered.height(),
        "filtered orders"
    );
    Ok(RecordSet::new(filtered))
}

/// Sorted distinct non-null values of `column`, for building the selectors.
pub fn distinct_values(records: &RecordSet, column: &str) -> Result<Vec<String>, FilterError> {
    let values = text_column(records.frame(), column)?;
    let unique: BTreeSet<String> = values
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(unique.into_iter().collect())
}

/// Non-text columns are compared through their string rendering.
fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Column> {
    df.column(name)?.cast(&DataType::String)
}

fn name_matches(name: Option<&str>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    name.is_some_and(|n| n.to_lowercase().contains(needle))
}

fn member_of(value: Option<&str>, allowed: &BTreeSet<String>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{records_from, ORDERS_CSV, SCENARIO_CSV};
    use crate::data::ORDER_ID;

    fn ids(records: &RecordSet) -> Vec<i64> {
        records
            .frame()
            .column(ORDER_ID)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn name_match_is_partial_and_case_insensitive() {
        let records = records_from(SCENARIO_CSV);
        for text in ["neha", "NEHA", "ha shar", "  Neha  "] {
            let found = filter(&records, &OrderQuery::new(text)).unwrap();
            assert_eq!(ids(&found), vec![2], "query {text:?}");
        }
        let none = filter(&records, &OrderQuery::new("nehax")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let records = records_from(ORDERS_CSV);
        for text in ["", "   "] {
            let found = filter(&records, &OrderQuery::new(text)).unwrap();
            assert_eq!(ids(&found), vec![101, 102, 103, 104, 105, 106]);
        }
    }

    #[test]
    fn missing_names_never_match_text() {
        let records = records_from(ORDERS_CSV);
        let found = filter(&records, &OrderQuery::new("a")).unwrap();
        assert!(!ids(&found).contains(&105));

        let all = filter(&records, &OrderQuery::new("")).unwrap();
        assert!(ids(&all).contains(&105));
    }

    #[test]
    fn status_and_city_combine_with_and() {
        let records = records_from(ORDERS_CSV);

        let shipped = OrderQuery::new("").with_statuses(["Shipped"]);
        assert_eq!(ids(&filter(&records, &shipped).unwrap()), vec![101, 104]);

        let shipped_in_delhi = shipped.clone().with_cities(["Delhi"]);
        assert_eq!(ids(&filter(&records, &shipped_in_delhi).unwrap()), vec![101]);

        let neha_pending_or_shipped = OrderQuery::new("neha")
            .with_statuses(["Pending", "Shipped"])
            .with_cities(["Mumbai", "Bengaluru"]);
        assert_eq!(
            ids(&filter(&records, &neha_pending_or_shipped).unwrap()),
            vec![102, 104]
        );

        let nowhere = OrderQuery::new("").with_cities(["Chennai"]);
        assert!(filter(&records, &nowhere).unwrap().is_empty());
    }

    #[test]
    fn empty_selections_equal_selecting_everything() {
        let records = records_from(ORDERS_CSV);
        let all_statuses = distinct_values(&records, STATUS).unwrap();
        let all_cities = distinct_values(&records, CITY).unwrap();

        for text in ["", "a", "sharma", "zzz"] {
            let open = filter(&records, &OrderQuery::new(text)).unwrap();
            let full = OrderQuery::new(text)
                .with_statuses(all_statuses.clone())
                .with_cities(all_cities.clone());
            let closed = filter(&records, &full).unwrap();
            assert!(open.frame().equals_missing(closed.frame()), "query {text:?}");
        }
    }

    #[test]
    fn result_is_an_idempotent_subset() {
        let records = records_from(ORDERS_CSV);
        let all = ids(&records);
        let queries = [
            OrderQuery::new("a"),
            OrderQuery::new("SHARMA").with_cities(["Mumbai"]),
            OrderQuery::new("").with_statuses(["Pending"]),
            OrderQuery::new("x"),
        ];
        for query in &queries {
            let once = filter(&records, query).unwrap();
            assert!(ids(&once).iter().all(|id| all.contains(id)));

            let twice = filter(&once, query).unwrap();
            assert!(once.frame().equals_missing(twice.frame()));
        }
    }

    #[test]
    fn filtering_leaves_the_source_untouched() {
        let records = records_from(ORDERS_CSV);
        let _ = filter(&records, &OrderQuery::new("neha")).unwrap();
        assert_eq!(records.len(), 6);
    }

    #[test]
    fn distinct_values_are_sorted_without_nulls() {
        let records = records_from(ORDERS_CSV);
        assert_eq!(
            distinct_values(&records, CITY).unwrap(),
            vec!["Bengaluru", "Delhi", "Mumbai"]
        );
        assert_eq!(
            distinct_values(&records, CUSTOMER_NAME).unwrap(),
            vec!["Aarav Mehta", "Neha Sharma", "Priya Nair", "Rohan Gupta"]
        );
    }
}
