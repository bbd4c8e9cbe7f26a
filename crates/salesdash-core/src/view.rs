use std::collections::HashSet;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregates::{
    aggregate_category_revenue, aggregate_category_sales, aggregate_monthly_transactions,
    aggregate_payment_counts, CategoryRevenue, CategorySales, MonthlyTransactions,
    PaymentTypeCount,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::filters::{
    category_options, filter_by_category, filter_by_date, order_ids, payment_orders_in_range,
    restrict_payments, DateRange, ALL_CATEGORIES,
};
use crate::sales::JoinReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub date_range: Option<DateRange>,
    pub category: String,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            date_range: None,
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

/// The four aggregates plus what the selector and status line need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filters: DashboardFilters,
    pub record_count: usize,
    pub join_report: JoinReport,
    pub category_options: Vec<String>,
    pub category_sales: Vec<CategorySales>,
    pub category_revenue: Vec<CategoryRevenue>,
    pub payment_counts: Vec<PaymentTypeCount>,
    pub monthly_transactions: Vec<MonthlyTransactions>,
}

impl DashboardView {
    pub fn top_category_sales(&self, n: usize) -> &[CategorySales] {
        &self.category_sales[..n.min(self.category_sales.len())]
    }

    pub fn top_category_revenue(&self, n: usize) -> &[CategoryRevenue] {
        &self.category_revenue[..n.min(self.category_revenue.len())]
    }
}

/// Output of one pass: the view and the sales records it was computed from.
#[derive(Debug, Clone)]
pub struct RenderPass {
    pub view: DashboardView,
    pub records: DataFrame,
}

/// Runs join, filters and aggregation over `dataset` for one set of filter inputs.
///
/// Default filters reproduce the unfiltered dashboard, and so does a date range spanning
/// every purchase.
pub fn build_view(dataset: &Dataset, filters: &DashboardFilters) -> Result<RenderPass> {
    let join = dataset.join_sales()?;

    let records = match filters.date_range {
        Some(range) => filter_by_date(&join.records, &dataset.orders, range.start, range.end)?,
        None => join.records,
    };

    let options = category_options(&records)?;
    if !options.iter().any(|option| option == &filters.category) {
        warn!(
            category = %filters.category,
            "category not present in the selected period"
        );
    }

    let records = filter_by_category(&records, &filters.category)?;

    let category_sales = aggregate_category_sales(&records)?;
    let category_revenue = aggregate_category_revenue(&records)?;

    let payments = match payment_scope(dataset, filters, &records)? {
        Some(allowed) => {
            let payments = restrict_payments(&dataset.payments, &allowed)?;
            debug!(
                orders = allowed.len(),
                payments = payments.height(),
                "payments restricted to filtered orders"
            );
            payments
        }
        None => dataset.payments.clone(),
    };
    let payment_counts = aggregate_payment_counts(&payments, None)?;
    let monthly_transactions = aggregate_monthly_transactions(&payments, &dataset.orders)?;

    info!(
        records = records.height(),
        categories = category_sales.len(),
        payment_types = payment_counts.len(),
        months = monthly_transactions.len(),
        "dashboard view built"
    );

    let view = DashboardView {
        filters: filters.clone(),
        record_count: records.height(),
        join_report: join.report,
        category_options: options,
        category_sales,
        category_revenue,
        payment_counts,
        monthly_transactions,
    };

    Ok(RenderPass { view, records })
}

/// Order ids whose payments the filters keep, or `None` when every payment counts.
///
/// The date range drops payments of orders purchased outside it. A category drops payments
/// of orders without a sales record in that category.
fn payment_scope(
    dataset: &Dataset,
    filters: &DashboardFilters,
    records: &DataFrame,
) -> Result<Option<HashSet<String>>> {
    let in_period = match filters.date_range {
        Some(range) => Some(payment_orders_in_range(
            &dataset.payments,
            &dataset.orders,
            range,
        )?),
        None => None,
    };

    if filters.category == ALL_CATEGORIES {
        return Ok(in_period);
    }

    let in_category = order_ids(records)?;
    Ok(Some(match in_period {
        Some(in_period) => in_period.intersection(&in_category).cloned().collect(),
        None => in_category,
    }))
}
