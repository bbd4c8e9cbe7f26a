pub mod aggregates;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filters;
pub mod sales;
pub mod source;
pub mod view;

pub use error::{DashboardError, Result};
