use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use salesdash_core::aggregates::{
    CategoryRevenue, CategorySales, MonthlyTransactions, PaymentTypeCount, UNKNOWN_CATEGORY,
};
use salesdash_core::view::DashboardView;

pub fn render_view(view: &DashboardView, top: usize) -> String {
    let sections = [
        (
            format!("Top {top} Product Categories by Sales"),
            category_sales_table(view.top_category_sales(top)),
        ),
        (
            format!("Top {top} Product Categories by Revenue"),
            category_revenue_table(view.top_category_revenue(top)),
        ),
        (
            "Distribution of Payment Methods".to_string(),
            payment_table(&view.payment_counts),
        ),
        (
            "Monthly Sales Trend".to_string(),
            monthly_table(&view.monthly_transactions),
        ),
    ];

    let mut out = format!("E-Commerce Sales Dashboard\n{}\n", status_line(view));
    for (title, table) in sections {
        out.push_str(&format!("\n{title}\n{table}\n"));
    }
    out
}

fn status_line(view: &DashboardView) -> String {
    let period = match &view.filters.date_range {
        Some(range) => format!("{} to {}", range.start, range.end),
        None => "all dates".to_string(),
    };
    let mut line = format!(
        "{} sales records | period: {} | category: {}",
        view.record_count, period, view.filters.category
    );

    let unknown = view.join_report.unknown_category_rows();
    if unknown > 0 {
        line.push_str(&format!(
            " | {unknown} of {} order items grouped as {UNKNOWN_CATEGORY}",
            view.join_report.order_items
        ));
    }
    line
}

fn new_table(header: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn right(value: impl std::fmt::Display) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn category_sales_table(rows: &[CategorySales]) -> Table {
    let mut table = new_table(["Product Category", "Total Sales"]);
    for row in rows {
        table.add_row(vec![Cell::new(row.label()), right(row.total_sales)]);
    }
    table
}

fn category_revenue_table(rows: &[CategoryRevenue]) -> Table {
    let mut table = new_table(["Product Category", "Total Revenue"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.label()),
            right(format!("{:.2}", row.total_revenue)),
        ]);
    }
    table
}

fn payment_table(rows: &[PaymentTypeCount]) -> Table {
    let mut table = new_table(["Payment Method", "Count"]);
    for row in rows {
        table.add_row(vec![Cell::new(&row.payment_type), right(row.count)]);
    }
    table
}

fn monthly_table(rows: &[MonthlyTransactions]) -> Table {
    let mut table = new_table(["Month", "Number of Transactions"]);
    for row in rows {
        table.add_row(vec![Cell::new(row.month), right(row.transactions)]);
    }
    table
}
