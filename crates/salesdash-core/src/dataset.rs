use std::collections::HashMap;
use std::sync::Arc;

use blake3::Hasher;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use salesdash_parser::schema::{ORDER_ID, ORDER_PURCHASE_TIMESTAMP};
use salesdash_parser::{parse_table, TableKind};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::source::DataSource;

static SNAPSHOT: OnceCell<Arc<Dataset>> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: TableKind,
    pub rows: usize,
    /// blake3 of the raw CSV text; absent for frames built in memory.
    pub fingerprint: Option<String>,
}

/// Immutable in-memory copy of the five source tables.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub order_items: DataFrame,
    pub orders: DataFrame,
    pub payments: DataFrame,
    pub products: DataFrame,
    pub category_translation: DataFrame,
    pub tables: Vec<TableSummary>,
}

impl Dataset {
    /// Fetches and parses every table from `source`. Any failure is fatal.
    pub fn load(source: &DataSource) -> Result<Self> {
        info!(%source, "loading dataset");

        let mut frames: HashMap<TableKind, DataFrame> = HashMap::new();
        let mut tables = Vec::with_capacity(TableKind::ALL.len());

        for table in TableKind::ALL {
            let content = source.fetch(table)?;
            let fingerprint = compute_hash(content.as_bytes());
            let df = parse_table(table, &content)?;

            info!(%table, rows = df.height(), %fingerprint, "table loaded");
            tables.push(TableSummary {
                table,
                rows: df.height(),
                fingerprint: Some(fingerprint),
            });
            frames.insert(table, df);
        }

        let mut take = |table: TableKind| frames.remove(&table).unwrap_or_default();

        Ok(Self {
            order_items: take(TableKind::OrderItems),
            orders: take(TableKind::Orders),
            payments: take(TableKind::Payments),
            products: take(TableKind::Products),
            category_translation: take(TableKind::CategoryTranslation),
            tables,
        })
    }

    pub fn from_frames(
        order_items: DataFrame,
        orders: DataFrame,
        payments: DataFrame,
        products: DataFrame,
        category_translation: DataFrame,
    ) -> Self {
        let tables = [
            (TableKind::OrderItems, &order_items),
            (TableKind::Orders, &orders),
            (TableKind::Payments, &payments),
            (TableKind::Products, &products),
            (TableKind::CategoryTranslation, &category_translation),
        ]
        .into_iter()
        .map(|(table, df)| TableSummary {
            table,
            rows: df.height(),
            fingerprint: None,
        })
        .collect();

        Self {
            order_items,
            orders,
            payments,
            products,
            category_translation,
            tables,
        }
    }

    /// Earliest and latest purchase date across dated orders.
    pub fn purchase_date_span(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let times = purchase_times(&self.orders)?;
        let span = times
            .values()
            .flatten()
            .map(|ts| ts.date())
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| match acc {
                None => Some((date, date)),
                Some((min, max)) => Some((min.min(date), max.max(date))),
            });
        Ok(span)
    }
}

/// Returns the process-wide snapshot, loading it from `source` on first use.
/// Later calls return the same snapshot whatever source they pass.
pub fn shared(source: &DataSource) -> Result<Arc<Dataset>> {
    SNAPSHOT
        .get_or_try_init(|| Dataset::load(source).map(Arc::new))
        .cloned()
}

fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}

pub(crate) fn str_values<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

pub(crate) fn f64_values<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    Ok(df.column(name)?.as_materialized_series().f64()?)
}

/// Purchase time per order id. The first row wins for repeated ids; undated orders map to `None`.
pub(crate) fn purchase_times(orders: &DataFrame) -> Result<HashMap<String, Option<NaiveDateTime>>> {
    let ids = str_values(orders, ORDER_ID)?;
    let micros = orders
        .column(ORDER_PURCHASE_TIMESTAMP)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let micros = micros.i64()?;

    let mut map = HashMap::with_capacity(orders.height());
    for idx in 0..orders.height() {
        let Some(order_id) = ids.get(idx) else {
            continue;
        };
        let purchased = micros.get(idx).and_then(naive_from_micros);
        map.entry(order_id.to_string()).or_insert(purchased);
    }

    Ok(map)
}

fn naive_from_micros(value: i64) -> Option<NaiveDateTime> {
    let secs = value.div_euclid(1_000_000);
    let micros = value.rem_euclid(1_000_000) as u32;
    chrono::DateTime::<Utc>::from_timestamp(secs, micros * 1_000).map(|dt| dt.naive_utc())
}
