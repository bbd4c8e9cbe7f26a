pub mod errors;
pub mod model;
pub mod schema;
pub mod tables;
mod registry;

pub use errors::ParserError;
pub use model::TableKind;
pub use registry::{parse_table, parser_for, TableParser};
