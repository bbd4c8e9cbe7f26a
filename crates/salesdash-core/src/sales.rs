use std::collections::hash_map::Entry;
use std::collections::HashMap;

use polars::prelude::*;
use salesdash_parser::schema::{PRODUCT_CATEGORY_NAME, PRODUCT_CATEGORY_NAME_ENGLISH, PRODUCT_ID};
use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{str_values, Dataset};
use crate::error::Result;

/// How many order items could not be given an English category, and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub order_items: usize,
    pub missing_product: usize,
    pub missing_category: usize,
    pub untranslated_category: usize,
    pub duplicate_products: usize,
    pub duplicate_translations: usize,
}

impl JoinReport {
    /// Rows that land in the unknown-category bucket.
    pub fn unknown_category_rows(&self) -> usize {
        self.missing_product + self.missing_category + self.untranslated_category
    }
}

#[derive(Debug, Clone)]
pub struct SalesJoin {
    pub records: DataFrame,
    pub report: JoinReport,
}

/// Left-joins order items to products and then to the category translation table.
///
/// The output keeps every order item, in input order, with two extra columns:
/// `product_category_name` and `product_category_name_english`. Repeated product ids or
/// category names on the right-hand side resolve to their first occurrence, so the row
/// count never changes.
pub fn join_sales(
    order_items: &DataFrame,
    products: &DataFrame,
    category_translation: &DataFrame,
) -> Result<SalesJoin> {
    let mut report = JoinReport {
        order_items: order_items.height(),
        ..JoinReport::default()
    };

    let product_ids = str_values(products, PRODUCT_ID)?;
    let product_categories = str_values(products, PRODUCT_CATEGORY_NAME)?;
    let mut category_by_product: HashMap<&str, Option<&str>> =
        HashMap::with_capacity(products.height());
    for idx in 0..products.height() {
        let Some(product_id) = product_ids.get(idx) else {
            continue;
        };
        match category_by_product.entry(product_id) {
            Entry::Occupied(_) => report.duplicate_products += 1,
            Entry::Vacant(slot) => {
                slot.insert(product_categories.get(idx));
            }
        }
    }

    let local_names = str_values(category_translation, PRODUCT_CATEGORY_NAME)?;
    let english_names = str_values(category_translation, PRODUCT_CATEGORY_NAME_ENGLISH)?;
    let mut english_by_category: HashMap<&str, Option<&str>> =
        HashMap::with_capacity(category_translation.height());
    for idx in 0..category_translation.height() {
        let Some(local) = local_names.get(idx) else {
            continue;
        };
        match english_by_category.entry(local) {
            Entry::Occupied(_) => report.duplicate_translations += 1,
            Entry::Vacant(slot) => {
                slot.insert(english_names.get(idx));
            }
        }
    }

    let item_products = str_values(order_items, PRODUCT_ID)?;
    let mut categories: Vec<Option<&str>> = Vec::with_capacity(order_items.height());
    let mut english: Vec<Option<&str>> = Vec::with_capacity(order_items.height());

    for idx in 0..order_items.height() {
        let category = match item_products
            .get(idx)
            .and_then(|product_id| category_by_product.get(product_id))
        {
            None => {
                report.missing_product += 1;
                None
            }
            Some(None) => {
                report.missing_category += 1;
                None
            }
            Some(Some(category)) => Some(*category),
        };

        let translated = match category {
            None => None,
            Some(category) => match english_by_category.get(category) {
                Some(Some(name)) => Some(*name),
                _ => {
                    report.untranslated_category += 1;
                    None
                }
            },
        };

        categories.push(category);
        english.push(translated);
    }

    let mut records = order_items.clone();
    let columns: [Column; 2] = [
        Series::new(PRODUCT_CATEGORY_NAME.into(), categories).into(),
        Series::new(PRODUCT_CATEGORY_NAME_ENGLISH.into(), english).into(),
    ];
    records.hstack_mut(&columns)?;

    if report.duplicate_products > 0 || report.duplicate_translations > 0 {
        warn!(
            duplicate_products = report.duplicate_products,
            duplicate_translations = report.duplicate_translations,
            "duplicate join keys ignored; first occurrence kept"
        );
    }
    if report.unknown_category_rows() > 0 {
        warn!(
            missing_product = report.missing_product,
            missing_category = report.missing_category,
            untranslated_category = report.untranslated_category,
            "order items without an English category grouped as unknown"
        );
    }
    debug!(rows = records.height(), "sales records joined");

    Ok(SalesJoin { records, report })
}

impl Dataset {
    pub fn join_sales(&self) -> Result<SalesJoin> {
        join_sales(&self.order_items, &self.products, &self.category_translation)
    }
}
