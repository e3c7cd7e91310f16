//! Entity store boundary for beer records.
//!
//! This module defines the persistence abstraction the stock service depends on,
//! plus an in-memory implementation (tests/dev) and a Postgres implementation.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryBeerStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresBeerStore;
pub use r#trait::{BeerStore, StoreError};
