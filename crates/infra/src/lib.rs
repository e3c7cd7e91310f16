//! Infrastructure layer: entity stores and the stock service built on them.

pub mod stock_service;
pub mod store;

pub use stock_service::{StockService, StockServiceError};
