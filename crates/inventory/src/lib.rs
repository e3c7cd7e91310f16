//! Beer inventory domain module.
//!
//! This crate contains business rules for the beer stock, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod beer;

pub use beer::{
    Beer, BeerType, MAX_BRAND_LEN, MAX_CAPACITY, MAX_NAME_LEN, NewBeer, validate_adjustment,
};
