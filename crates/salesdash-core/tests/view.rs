use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use polars::prelude::*;
use salesdash_core::aggregates::{
    aggregate_category_sales, aggregate_monthly_transactions, aggregate_payment_counts,
};
use salesdash_core::dataset::{self, Dataset};
use salesdash_core::export::{export_view, SALES_FILE_NAME, VIEW_FILE_NAME};
use salesdash_core::filters::DateRange;
use salesdash_core::source::DataSource;
use salesdash_core::view::{build_view, DashboardFilters};
use salesdash_core::DashboardError;
use salesdash_parser::TableKind;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../salesdash-parser/tests/data")
}

fn fixture_dataset() -> Dataset {
    Dataset::load(&DataSource::Directory(fixture_dir())).expect("fixture dataset should load")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn load_records_table_summaries() {
    let dataset = fixture_dataset();

    let rows: Vec<(TableKind, usize)> = dataset
        .tables
        .iter()
        .map(|summary| (summary.table, summary.rows))
        .collect();
    assert_eq!(
        rows,
        vec![
            (TableKind::OrderItems, 8),
            (TableKind::Orders, 6),
            (TableKind::Payments, 8),
            (TableKind::Products, 5),
            (TableKind::CategoryTranslation, 4),
        ]
    );
    assert!(dataset
        .tables
        .iter()
        .all(|summary| summary.fingerprint.as_ref().is_some_and(|hash| hash.len() == 64)));
}

#[test]
fn missing_table_is_a_fetch_failure() {
    let empty = tempfile::tempdir().unwrap();

    let err = Dataset::load(&DataSource::Directory(empty.path().to_path_buf()))
        .expect_err("empty directory cannot load");

    match err {
        DashboardError::Fetch { table, location, .. } => {
            assert_eq!(table, TableKind::OrderItems);
            assert!(location.ends_with("order_items_dataset.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_table_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    for table in TableKind::ALL {
        std::fs::copy(fixture_dir().join(table.file_name()), dir.path().join(table.file_name()))
            .unwrap();
    }
    std::fs::write(
        dir.path().join(TableKind::Orders.file_name()),
        "order_id,order_purchase_timestamp\no1,not a date\n",
    )
    .unwrap();

    let err = Dataset::load(&DataSource::Directory(dir.path().to_path_buf()))
        .expect_err("bad timestamp should fail the load");

    assert!(matches!(
        err,
        DashboardError::Load {
            table: TableKind::Orders,
            ..
        }
    ));
    assert!(err.is_fatal());
}

#[cfg(unix)]
#[test]
fn directory_with_non_utf8_name_loads() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join(OsStr::from_bytes(b"data-\xff"));
    std::fs::create_dir(&dir).unwrap();
    for table in TableKind::ALL {
        std::fs::copy(fixture_dir().join(table.file_name()), dir.join(table.file_name())).unwrap();
    }

    let dataset = Dataset::load(&DataSource::Directory(dir)).expect("non-UTF-8 path should load");

    assert_eq!(dataset.order_items.height(), 8);
}

#[test]
fn shared_snapshot_loads_once() {
    let source = DataSource::Directory(fixture_dir());

    let first = dataset::shared(&source).expect("snapshot should load");
    let second = dataset::shared(&DataSource::Directory(PathBuf::from("/nonexistent")))
        .expect("snapshot is already initialised");

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn default_filters_reproduce_unfiltered_dashboard() {
    let dataset = fixture_dataset();
    let records = dataset.join_sales().unwrap().records;

    let pass = build_view(&dataset, &DashboardFilters::default()).expect("view failed");

    assert_eq!(pass.view.record_count, dataset.order_items.height());
    assert_eq!(
        pass.view.category_sales,
        aggregate_category_sales(&records).unwrap()
    );
    assert_eq!(
        pass.view.payment_counts,
        aggregate_payment_counts(&dataset.payments, None).unwrap()
    );
    assert_eq!(
        pass.view.monthly_transactions,
        aggregate_monthly_transactions(&dataset.payments, &dataset.orders).unwrap()
    );
    assert_eq!(pass.view.join_report.unknown_category_rows(), 3);
    assert_eq!(pass.view.top_category_sales(2).len(), 2);
    assert_eq!(pass.view.top_category_revenue(10).len(), 4);
}

#[test]
fn full_purchase_span_reproduces_unfiltered_dashboard() {
    let dataset = fixture_dataset();
    let (min, max) = dataset.purchase_date_span().unwrap().expect("fixture has dated orders");
    let filters = DashboardFilters {
        date_range: Some(DateRange::new(min, max)),
        ..DashboardFilters::default()
    };

    let unfiltered = build_view(&dataset, &DashboardFilters::default()).unwrap().view;
    let spanned = build_view(&dataset, &filters).unwrap().view;

    assert_eq!(spanned.record_count, unfiltered.record_count);
    assert_eq!(spanned.category_sales, unfiltered.category_sales);
    assert_eq!(spanned.category_revenue, unfiltered.category_revenue);
    assert_eq!(spanned.payment_counts, unfiltered.payment_counts);
    assert_eq!(spanned.monthly_transactions, unfiltered.monthly_transactions);
}

#[test]
fn date_filter_counts_payments_of_orders_without_items() {
    let dataset = fixture_dataset();
    let filters = DashboardFilters {
        date_range: Some(DateRange::new(date(2018, 2, 1), date(2018, 2, 28))),
        ..DashboardFilters::default()
    };

    let view = build_view(&dataset, &filters).unwrap().view;

    // o5 was canceled before any item shipped but its voucher payment still belongs to February
    assert_eq!(view.record_count, 2);
    assert!(view
        .payment_counts
        .iter()
        .any(|row| row.payment_type == "voucher" && row.count == 1));
    assert_eq!(view.monthly_transactions.len(), 1);
    assert_eq!(view.monthly_transactions[0].month.to_string(), "2018-02");
    assert_eq!(view.monthly_transactions[0].transactions, 2);
}

#[test]
fn filters_narrow_every_aggregate() {
    let dataset = fixture_dataset();
    let filters = DashboardFilters {
        date_range: Some(DateRange::new(date(2017, 11, 1), date(2017, 11, 30))),
        category: "health_beauty".to_string(),
    };

    let pass = build_view(&dataset, &filters).expect("view failed");
    let view = &pass.view;

    assert_eq!(view.record_count, 2);
    assert_eq!(pass.records.height(), 2);
    assert_eq!(
        view.category_options,
        vec!["All", "health_beauty", "sports_leisure"]
    );
    assert_eq!(view.category_sales.len(), 1);
    assert_eq!(view.category_sales[0].label(), "health_beauty");

    let payment_types: Vec<&str> = view
        .payment_counts
        .iter()
        .map(|row| row.payment_type.as_str())
        .collect();
    assert_eq!(payment_types, vec!["credit_card", "voucher"]);

    assert_eq!(view.monthly_transactions.len(), 1);
    assert_eq!(view.monthly_transactions[0].month.to_string(), "2017-11");
    assert_eq!(view.monthly_transactions[0].transactions, 2);
}

#[test]
fn inverted_range_renders_empty_view() {
    let dataset = fixture_dataset();
    let filters = DashboardFilters {
        date_range: Some(DateRange::new(date(2018, 3, 1), date(2017, 3, 1))),
        ..DashboardFilters::default()
    };

    let view = build_view(&dataset, &filters).expect("view failed").view;

    assert_eq!(view.record_count, 0);
    assert_eq!(view.category_options, vec!["All"]);
    assert!(view.category_sales.is_empty());
    assert!(view.category_revenue.is_empty());
    assert!(view.payment_counts.is_empty());
    assert!(view.monthly_transactions.is_empty());
}

#[test]
fn export_writes_json_and_parquet() {
    let dataset = fixture_dataset();
    let pass = build_view(&dataset, &DashboardFilters::default()).unwrap();
    let out = tempfile::tempdir().unwrap();

    let paths = export_view(&pass.view, &pass.records, &out.path().join("run"))
        .expect("export failed");

    assert!(paths.view_json.ends_with(VIEW_FILE_NAME));
    assert!(paths.sales_parquet.ends_with(SALES_FILE_NAME));

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&paths.view_json).unwrap()).unwrap();
    assert_eq!(json["record_count"], 8);
    assert_eq!(json["filters"]["category"], "All");
    assert_eq!(json["monthly_transactions"][0]["month"], "2017-10");
    assert!(json["category_sales"][0]["category"].is_null());

    let sales = ParquetReader::new(File::open(&paths.sales_parquet).unwrap())
        .finish()
        .unwrap();
    assert_eq!(sales.height(), 8);
    assert!(sales.column("product_category_name_english").is_ok());
}
