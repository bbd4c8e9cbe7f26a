use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use chrono::Datelike;
use polars::df;
use polars::prelude::*;
use salesdash_parser::schema::{ORDER_ID, PAYMENT_TYPE, PRICE, PRODUCT_CATEGORY_NAME_ENGLISH};
use serde::{Serialize, Serializer};

use crate::dataset::{f64_values, purchase_times, str_values};
use crate::error::Result;

/// Label shown for the group of records without an English category.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    pub category: Option<String>,
    pub total_sales: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: Option<String>,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentTypeCount {
    pub payment_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTransactions {
    pub month: YearMonth,
    pub transactions: u64,
}

impl CategorySales {
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN_CATEGORY)
    }
}

impl CategoryRevenue {
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN_CATEGORY)
    }
}

/// A calendar month, ordered chronologically and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Named categories ascending, the unknown bucket last.
fn group_key_order(a: &Option<&str>, b: &Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of sales records per English category, most sales first.
pub fn aggregate_category_sales(records: &DataFrame) -> Result<Vec<CategorySales>> {
    let english = str_values(records, PRODUCT_CATEGORY_NAME_ENGLISH)?;

    let mut counts: HashMap<Option<&str>, u64> = HashMap::new();
    for idx in 0..records.height() {
        *counts.entry(english.get(idx)).or_insert(0) += 1;
    }

    let mut groups: Vec<(Option<&str>, u64)> = counts.into_iter().collect();
    groups.sort_by(|a, b| group_key_order(&a.0, &b.0));
    groups.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(groups
        .into_iter()
        .map(|(category, total_sales)| CategorySales {
            category: category.map(str::to_string),
            total_sales,
        })
        .collect())
}

/// Sum of item prices per English category, highest revenue first.
pub fn aggregate_category_revenue(records: &DataFrame) -> Result<Vec<CategoryRevenue>> {
    let english = str_values(records, PRODUCT_CATEGORY_NAME_ENGLISH)?;
    let prices = f64_values(records, PRICE)?;

    let mut sums: HashMap<Option<&str>, f64> = HashMap::new();
    for idx in 0..records.height() {
        *sums.entry(english.get(idx)).or_insert(0.0) += prices.get(idx).unwrap_or(0.0);
    }

    let mut groups: Vec<(Option<&str>, f64)> = sums.into_iter().collect();
    groups.sort_by(|a, b| group_key_order(&a.0, &b.0));
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(groups
        .into_iter()
        .map(|(category, total_revenue)| CategoryRevenue {
            category: category.map(str::to_string),
            total_revenue,
        })
        .collect())
}

/// Payments per payment type, most used first; ties keep first-seen order.
///
/// `allowed_order_ids` of `None` counts every payment.
pub fn aggregate_payment_counts(
    payments: &DataFrame,
    allowed_order_ids: Option<&HashSet<String>>,
) -> Result<Vec<PaymentTypeCount>> {
    let order_ids = str_values(payments, ORDER_ID)?;
    let payment_types = str_values(payments, PAYMENT_TYPE)?;

    let mut counts: Vec<PaymentTypeCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for idx in 0..payments.height() {
        if let Some(allowed) = allowed_order_ids {
            match order_ids.get(idx) {
                Some(order_id) if allowed.contains(order_id) => {}
                _ => continue,
            }
        }
        let Some(payment_type) = payment_types.get(idx) else {
            continue;
        };

        let position = *positions.entry(payment_type).or_insert_with(|| {
            counts.push(PaymentTypeCount {
                payment_type: payment_type.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[position].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

/// Payments per calendar month of the order's purchase, oldest month first.
///
/// Payments whose order is missing or undated are not counted.
pub fn aggregate_monthly_transactions(
    payments: &DataFrame,
    orders: &DataFrame,
) -> Result<Vec<MonthlyTransactions>> {
    let purchased = purchase_times(orders)?;
    let order_ids = str_values(payments, ORDER_ID)?;

    let mut months: BTreeMap<YearMonth, u64> = BTreeMap::new();
    for idx in 0..payments.height() {
        let Some(Some(ts)) = order_ids.get(idx).and_then(|id| purchased.get(id)) else {
            continue;
        };
        *months.entry(YearMonth::of(*ts)).or_insert(0) += 1;
    }

    Ok(months
        .into_iter()
        .map(|(month, transactions)| MonthlyTransactions {
            month,
            transactions,
        })
        .collect())
}

pub fn category_sales_frame(rows: &[CategorySales]) -> Result<DataFrame> {
    Ok(df![
        PRODUCT_CATEGORY_NAME_ENGLISH => rows.iter().map(|row| row.category.as_deref()).collect::<Vec<_>>(),
        "total_sales" => rows.iter().map(|row| row.total_sales).collect::<Vec<_>>(),
    ]?)
}

pub fn category_revenue_frame(rows: &[CategoryRevenue]) -> Result<DataFrame> {
    Ok(df![
        PRODUCT_CATEGORY_NAME_ENGLISH => rows.iter().map(|row| row.category.as_deref()).collect::<Vec<_>>(),
        "total_revenue" => rows.iter().map(|row| row.total_revenue).collect::<Vec<_>>(),
    ]?)
}

pub fn payment_counts_frame(rows: &[PaymentTypeCount]) -> Result<DataFrame> {
    Ok(df![
        PAYMENT_TYPE => rows.iter().map(|row| row.payment_type.as_str()).collect::<Vec<_>>(),
        "count" => rows.iter().map(|row| row.count).collect::<Vec<_>>(),
    ]?)
}

pub fn monthly_transactions_frame(rows: &[MonthlyTransactions]) -> Result<DataFrame> {
    Ok(df![
        "order_month" => rows.iter().map(|row| row.month.to_string()).collect::<Vec<_>>(),
        "transactions" => rows.iter().map(|row| row.transactions).collect::<Vec<_>>(),
    ]?)
}
