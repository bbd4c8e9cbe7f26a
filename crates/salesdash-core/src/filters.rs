use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use polars::prelude::*;
use salesdash_parser::schema::{ORDER_ID, PRODUCT_CATEGORY_NAME_ENGLISH};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::{purchase_times, str_values};
use crate::error::{DashboardError, Result};

/// Category filter value that applies no restriction.
pub const ALL_CATEGORIES: &str = "All";

/// Inclusive range of purchase dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(DashboardError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Keeps the records whose order was purchased between `start` and `end`, both inclusive.
///
/// Records whose order is absent from `orders` or has no purchase timestamp are dropped.
/// An inverted range selects nothing.
pub fn filter_by_date(
    records: &DataFrame,
    orders: &DataFrame,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame> {
    let range = DateRange::new(start, end);
    if let Err(err) = range.validate() {
        warn!(%err, "date filter selects no orders");
    }

    let purchased = purchase_times(orders)?;
    let allowed: HashSet<&str> = purchased
        .iter()
        .filter(|(_, ts)| ts.is_some_and(|ts| range.contains(ts.date())))
        .map(|(order_id, _)| order_id.as_str())
        .collect();

    let filtered = filter_by_order_ids(records, &allowed)?;
    debug!(
        %start,
        %end,
        orders = allowed.len(),
        rows = filtered.height(),
        "date filter applied"
    );
    Ok(filtered)
}

/// Keeps the records whose English category equals `category` exactly.
/// [`ALL_CATEGORIES`] returns the records unchanged.
pub fn filter_by_category(records: &DataFrame, category: &str) -> Result<DataFrame> {
    if category == ALL_CATEGORIES {
        return Ok(records.clone());
    }

    let english = str_values(records, PRODUCT_CATEGORY_NAME_ENGLISH)?;
    let mask: Vec<bool> = (0..records.height())
        .map(|idx| english.get(idx) == Some(category))
        .collect();

    let filtered = records.filter(&BooleanChunked::new("mask".into(), mask))?;
    debug!(category, rows = filtered.height(), "category filter applied");
    Ok(filtered)
}

/// Selector options: the sentinel first, then every English category present, ascending.
pub fn category_options(records: &DataFrame) -> Result<Vec<String>> {
    let english = str_values(records, PRODUCT_CATEGORY_NAME_ENGLISH)?;
    let distinct: BTreeSet<&str> = (0..records.height())
        .filter_map(|idx| english.get(idx))
        .collect();

    let mut options = Vec::with_capacity(distinct.len() + 1);
    options.push(ALL_CATEGORIES.to_string());
    options.extend(distinct.into_iter().map(str::to_string));
    Ok(options)
}

/// Distinct order ids referenced by `records`.
pub fn order_ids(records: &DataFrame) -> Result<HashSet<String>> {
    let ids = str_values(records, ORDER_ID)?;
    Ok((0..records.height())
        .filter_map(|idx| ids.get(idx))
        .map(str::to_string)
        .collect())
}

/// Order ids of the payments a date filter keeps.
///
/// Payments of orders purchased outside `range` are dropped. Payments whose order is absent
/// or undated cannot be placed in time and are kept, so a range covering every purchase keeps
/// every payment. An inverted range keeps nothing.
pub fn payment_orders_in_range(
    payments: &DataFrame,
    orders: &DataFrame,
    range: DateRange,
) -> Result<HashSet<String>> {
    if range.validate().is_err() {
        return Ok(HashSet::new());
    }

    let purchased = purchase_times(orders)?;
    let outside: HashSet<&str> = purchased
        .iter()
        .filter(|(_, ts)| ts.is_some_and(|ts| !range.contains(ts.date())))
        .map(|(order_id, _)| order_id.as_str())
        .collect();

    let ids = str_values(payments, ORDER_ID)?;
    Ok((0..payments.height())
        .filter_map(|idx| ids.get(idx))
        .filter(|id| !outside.contains(id))
        .map(str::to_string)
        .collect())
}

/// Keeps the payments that belong to one of `allowed_order_ids`.
pub fn restrict_payments(
    payments: &DataFrame,
    allowed_order_ids: &HashSet<String>,
) -> Result<DataFrame> {
    let allowed: HashSet<&str> = allowed_order_ids.iter().map(String::as_str).collect();
    filter_by_order_ids(payments, &allowed)
}

fn filter_by_order_ids(df: &DataFrame, allowed: &HashSet<&str>) -> Result<DataFrame> {
    let ids = str_values(df, ORDER_ID)?;
    let mask: Vec<bool> = (0..df.height())
        .map(|idx| ids.get(idx).is_some_and(|id| allowed.contains(id)))
        .collect();

    Ok(df.filter(&BooleanChunked::new("mask".into(), mask))?)
}
