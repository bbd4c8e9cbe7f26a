use polars::prelude::*;
use serde::Deserialize;

use super::common::{build_frame, read_rows, str_column};
use crate::errors::ParserError;
use crate::model::TableKind;
use crate::registry::TableParser;
use crate::schema::{FREIGHT_VALUE, ORDER_ID, ORDER_ITEM_ID, PRICE, PRODUCT_ID};

#[derive(Debug, Deserialize)]
struct OrderItemRow {
    order_id: String,
    #[serde(default)]
    order_item_id: Option<i64>,
    product_id: String,
    price: f64,
    #[serde(default)]
    freight_value: Option<f64>,
}

pub struct OrderItemsParser;

impl TableParser for OrderItemsParser {
    fn kind(&self) -> TableKind {
        TableKind::OrderItems
    }

    fn parse(&self, content: &str) -> Result<DataFrame, ParserError> {
        let table = self.kind();
        let rows: Vec<OrderItemRow> = read_rows(table, content, &[ORDER_ID, PRODUCT_ID, PRICE])?;

        let mut order_ids = Vec::with_capacity(rows.len());
        let mut item_ids = Vec::with_capacity(rows.len());
        let mut product_ids = Vec::with_capacity(rows.len());
        let mut prices = Vec::with_capacity(rows.len());
        let mut freight = Vec::with_capacity(rows.len());

        for row in rows {
            order_ids.push(Some(row.order_id));
            item_ids.push(row.order_item_id);
            product_ids.push(Some(row.product_id));
            prices.push(row.price);
            freight.push(row.freight_value);
        }

        build_frame(
            table,
            vec![
                str_column(ORDER_ID, order_ids),
                Series::new(ORDER_ITEM_ID.into(), item_ids).into(),
                str_column(PRODUCT_ID, product_ids),
                Series::new(PRICE.into(), prices).into(),
                Series::new(FREIGHT_VALUE.into(), freight).into(),
            ],
        )
    }
}
