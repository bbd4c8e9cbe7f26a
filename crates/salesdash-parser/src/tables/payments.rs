use polars::prelude::*;
use serde::Deserialize;

use super::common::{build_frame, read_rows, str_column};
use crate::errors::ParserError;
use crate::model::TableKind;
use crate::registry::TableParser;
use crate::schema::{
    ORDER_ID, PAYMENT_INSTALLMENTS, PAYMENT_SEQUENTIAL, PAYMENT_TYPE, PAYMENT_VALUE,
};

#[derive(Debug, Deserialize)]
struct PaymentRow {
    order_id: String,
    #[serde(default)]
    payment_sequential: Option<i64>,
    payment_type: String,
    #[serde(default)]
    payment_installments: Option<i64>,
    payment_value: f64,
}

pub struct PaymentsParser;

impl TableParser for PaymentsParser {
    fn kind(&self) -> TableKind {
        TableKind::Payments
    }

    fn parse(&self, content: &str) -> Result<DataFrame, ParserError> {
        let table = self.kind();
        let rows: Vec<PaymentRow> =
            read_rows(table, content, &[ORDER_ID, PAYMENT_TYPE, PAYMENT_VALUE])?;

        let mut order_ids = Vec::with_capacity(rows.len());
        let mut sequentials = Vec::with_capacity(rows.len());
        let mut types = Vec::with_capacity(rows.len());
        let mut installments = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());

        for row in rows {
            order_ids.push(Some(row.order_id));
            sequentials.push(row.payment_sequential);
            types.push(Some(row.payment_type));
            installments.push(row.payment_installments);
            values.push(row.payment_value);
        }

        build_frame(
            table,
            vec![
                str_column(ORDER_ID, order_ids),
                Series::new(PAYMENT_SEQUENTIAL.into(), sequentials).into(),
                str_column(PAYMENT_TYPE, types),
                Series::new(PAYMENT_INSTALLMENTS.into(), installments).into(),
                Series::new(PAYMENT_VALUE.into(), values).into(),
            ],
        )
    }
}
