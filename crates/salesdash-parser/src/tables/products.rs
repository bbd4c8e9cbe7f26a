use polars::prelude::*;
use serde::Deserialize;

use super::common::{build_frame, read_rows, str_column};
use crate::errors::ParserError;
use crate::model::TableKind;
use crate::registry::TableParser;
use crate::schema::{PRODUCT_CATEGORY_NAME, PRODUCT_CATEGORY_NAME_ENGLISH, PRODUCT_ID};

#[derive(Debug, Deserialize)]
struct ProductRow {
    product_id: String,
    product_category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationRow {
    product_category_name: String,
    product_category_name_english: Option<String>,
}

pub struct ProductsParser;

impl TableParser for ProductsParser {
    fn kind(&self) -> TableKind {
        TableKind::Products
    }

    fn parse(&self, content: &str) -> Result<DataFrame, ParserError> {
        let table = self.kind();
        let rows: Vec<ProductRow> =
            read_rows(table, content, &[PRODUCT_ID, PRODUCT_CATEGORY_NAME])?;

        let (ids, categories): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .map(|row| (Some(row.product_id), row.product_category_name))
            .unzip();

        build_frame(
            table,
            vec![
                str_column(PRODUCT_ID, ids),
                str_column(PRODUCT_CATEGORY_NAME, categories),
            ],
        )
    }
}

pub struct CategoryTranslationParser;

impl TableParser for CategoryTranslationParser {
    fn kind(&self) -> TableKind {
        TableKind::CategoryTranslation
    }

    fn parse(&self, content: &str) -> Result<DataFrame, ParserError> {
        let table = self.kind();
        let rows: Vec<TranslationRow> = read_rows(
            table,
            content,
            &[PRODUCT_CATEGORY_NAME, PRODUCT_CATEGORY_NAME_ENGLISH],
        )?;

        let (names, english): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .map(|row| (Some(row.product_category_name), row.product_category_name_english))
            .unzip();

        build_frame(
            table,
            vec![
                str_column(PRODUCT_CATEGORY_NAME, names),
                str_column(PRODUCT_CATEGORY_NAME_ENGLISH, english),
            ],
        )
    }
}
