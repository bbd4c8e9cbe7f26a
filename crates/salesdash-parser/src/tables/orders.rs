use polars::prelude::*;
use serde::Deserialize;

use super::common::{
    build_frame, datetime_column, parse_timestamp, read_rows, str_column, timestamp_micros,
};
use crate::errors::ParserError;
use crate::model::TableKind;
use crate::registry::TableParser;
use crate::schema::{ORDER_ID, ORDER_PURCHASE_TIMESTAMP, ORDER_STATUS};

#[derive(Debug, Deserialize)]
struct OrderRow {
    order_id: String,
    #[serde(default)]
    order_status: Option<String>,
    #[serde(default)]
    order_purchase_timestamp: Option<String>,
}

pub struct OrdersParser;

impl TableParser for OrdersParser {
    fn kind(&self) -> TableKind {
        TableKind::Orders
    }

    fn parse(&self, content: &str) -> Result<DataFrame, ParserError> {
        let table = self.kind();
        let rows: Vec<OrderRow> =
            read_rows(table, content, &[ORDER_ID, ORDER_PURCHASE_TIMESTAMP])?;

        let mut order_ids = Vec::with_capacity(rows.len());
        let mut statuses = Vec::with_capacity(rows.len());
        let mut purchased = Vec::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            let timestamp = match row.order_purchase_timestamp.as_deref() {
                Some(raw) => parse_timestamp(raw).map_err(|message| ParserError::DataRow {
                    table,
                    // header occupies line 1
                    line_index: idx + 2,
                    message,
                })?,
                None => None,
            };

            order_ids.push(Some(row.order_id));
            statuses.push(row.order_status);
            purchased.push(timestamp.map(timestamp_micros));
        }

        build_frame(
            table,
            vec![
                str_column(ORDER_ID, order_ids),
                str_column(ORDER_STATUS, statuses),
                datetime_column(table, ORDER_PURCHASE_TIMESTAMP, purchased)?,
            ],
        )
    }
}
