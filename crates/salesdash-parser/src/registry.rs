use polars::prelude::DataFrame;

use crate::errors::ParserError;
use crate::model::TableKind;
use crate::tables::{
    CategoryTranslationParser, OrderItemsParser, OrdersParser, PaymentsParser, ProductsParser,
};

pub trait TableParser {
    fn kind(&self) -> TableKind;
    fn parse(&self, content: &str) -> Result<DataFrame, ParserError>;
}

pub fn parser_for(kind: TableKind) -> &'static dyn TableParser {
    match kind {
        TableKind::OrderItems => &OrderItemsParser,
        TableKind::Orders => &OrdersParser,
        TableKind::Payments => &PaymentsParser,
        TableKind::Products => &ProductsParser,
        TableKind::CategoryTranslation => &CategoryTranslationParser,
    }
}

/// Parses CSV text for `kind` into a DataFrame with the canonical column layout.
pub fn parse_table(kind: TableKind, content: &str) -> Result<DataFrame, ParserError> {
    parser_for(kind).parse(content)
}
