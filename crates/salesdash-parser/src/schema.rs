//! Canonical column names shared by the parsers and the pipeline.

pub const ORDER_ID: &str = "order_id";
pub const ORDER_ITEM_ID: &str = "order_item_id";
pub const PRODUCT_ID: &str = "product_id";
pub const PRICE: &str = "price";
pub const FREIGHT_VALUE: &str = "freight_value";

pub const ORDER_STATUS: &str = "order_status";
pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";

pub const PAYMENT_SEQUENTIAL: &str = "payment_sequential";
pub const PAYMENT_TYPE: &str = "payment_type";
pub const PAYMENT_INSTALLMENTS: &str = "payment_installments";
pub const PAYMENT_VALUE: &str = "payment_value";

pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
pub const PRODUCT_CATEGORY_NAME_ENGLISH: &str = "product_category_name_english";

pub const ORDER_ITEM_COLUMNS: [&str; 5] =
    [ORDER_ID, ORDER_ITEM_ID, PRODUCT_ID, PRICE, FREIGHT_VALUE];
pub const ORDER_COLUMNS: [&str; 3] = [ORDER_ID, ORDER_STATUS, ORDER_PURCHASE_TIMESTAMP];
pub const PAYMENT_COLUMNS: [&str; 5] = [
    ORDER_ID,
    PAYMENT_SEQUENTIAL,
    PAYMENT_TYPE,
    PAYMENT_INSTALLMENTS,
    PAYMENT_VALUE,
];
pub const PRODUCT_COLUMNS: [&str; 2] = [PRODUCT_ID, PRODUCT_CATEGORY_NAME];
pub const TRANSLATION_COLUMNS: [&str; 2] =
    [PRODUCT_CATEGORY_NAME, PRODUCT_CATEGORY_NAME_ENGLISH];
