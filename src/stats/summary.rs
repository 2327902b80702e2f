//! Summary Metrics Module
//! Row count, distinct customers and total order value of a record set.

use crate::data::{RecordSet, CUSTOMER_NAME, ORDER_VALUE};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The three headline metrics shown above the results.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub distinct_customers: usize,
    pub total_value: f64,
}

/// Compute the summary metrics. An empty set yields all zeros.
///
/// Missing customer names are not counted as a customer, and missing order
/// values are skipped in the total.
pub fn summarize(records: &RecordSet) -> Result<Summary, SummaryError> {
    if records.is_empty() {
        return Ok(Summary::default());
    }

    let df = records.frame();
    let names = df.column(CUSTOMER_NAME)?.cast(&DataType::String)?;
    let customers: HashSet<&str> = names.str()?.into_iter().flatten().collect();
    let total_value = df.column(ORDER_VALUE)?.f64()?.sum().unwrap_or(0.0);

    Ok(Summary {
        count: df.height(),
        distinct_customers: customers.len(),
        total_value,
    })
}

/// Format a money amount in whole units with thousands separators,
/// e.g. `2200.0` with `"₹"` gives `"₹2,200"`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let digits = format!("{:.0}", value.abs());
    let negative = value < 0.0 && digits.bytes().any(|b| b != b'0');

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{symbol}{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{records_from, ORDERS_CSV, SCENARIO_CSV};
    use crate::data::{filter, OrderQuery};

    #[test]
    fn scenario_metrics() {
        let records = records_from(SCENARIO_CSV);

        let both = filter(&records, &OrderQuery::new("a")).unwrap();
        assert_eq!(
            summarize(&both).unwrap(),
            Summary {
                count: 2,
                distinct_customers: 2,
                total_value: 2200.0,
            }
        );

        let neha = filter(&records, &OrderQuery::new("neha")).unwrap();
        let summary = summarize(&neha).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_value, 1200.0);
    }

    #[test]
    fn empty_set_is_all_zero() {
        let records = records_from(SCENARIO_CSV);
        let none = filter(&records, &OrderQuery::new("nobody")).unwrap();
        let summary = summarize(&none).unwrap();
        assert_eq!(summary, Summary::default());
        assert_eq!(format_currency(summary.total_value, "₹"), "₹0");
    }

    #[test]
    fn repeat_and_missing_customers() {
        let records = records_from(ORDERS_CSV);
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.count, 6);
        // Neha appears twice, row 105 has no name.
        assert_eq!(summary.distinct_customers, 4);
        assert_eq!(summary.total_value, 4749.0);
    }

    #[test]
    fn unpriced_rows_are_skipped_in_the_total() {
        let csv = "\
order_id,customer_name,status,city,order_date,quantity,unit_price
1,Aarav Mehta,Shipped,Delhi,2024-01-05,2,500
2,Neha Sharma,Pending,Mumbai,2024-01-07,1,
";
        let summary = summarize(&records_from(csv)).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_value, 1000.0);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(2200.0, "₹"), "₹2,200");
        assert_eq!(format_currency(999.0, "₹"), "₹999");
        assert_eq!(format_currency(1_234_567.4, "$"), "$1,234,567");
        assert_eq!(format_currency(100_000.0, "₹"), "₹100,000");
        assert_eq!(format_currency(-4500.0, "₹"), "₹-4,500");
        assert_eq!(format_currency(-0.2, "₹"), "₹0");
    }
}
