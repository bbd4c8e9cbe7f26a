use std::fmt;

use serde::{Deserialize, Serialize};

/// The five source tables of the e-commerce dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    OrderItems,
    Orders,
    Payments,
    Products,
    CategoryTranslation,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::OrderItems,
        TableKind::Orders,
        TableKind::Payments,
        TableKind::Products,
        TableKind::CategoryTranslation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::OrderItems => "order_items",
            TableKind::Orders => "orders",
            TableKind::Payments => "payments",
            TableKind::Products => "products",
            TableKind::CategoryTranslation => "category_translation",
        }
    }

    /// File name used by the published dataset.
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::OrderItems => "order_items_dataset.csv",
            TableKind::Orders => "orders_dataset.csv",
            TableKind::Payments => "order_payments_dataset.csv",
            TableKind::Products => "products_dataset.csv",
            TableKind::CategoryTranslation => "product_category_name_translation.csv",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TableKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.file_name() == normalized)
            .ok_or_else(|| format!("unknown table '{value}'"))
    }
}
