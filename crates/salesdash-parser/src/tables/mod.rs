mod common;
mod order_items;
mod orders;
mod payments;
mod products;

pub use common::parse_timestamp;
pub use order_items::OrderItemsParser;
pub use orders::OrdersParser;
pub use payments::PaymentsParser;
pub use products::{CategoryTranslationParser, ProductsParser};
