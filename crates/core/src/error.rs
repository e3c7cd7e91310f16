//! Domain error model.

use thiserror::Error;

use crate::id::BeerId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stock bounds, uniqueness, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing or empty field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested beer does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A beer with the same name is already stored.
    #[error("Beer with name {0} already registered in the system.")]
    AlreadyRegistered(String),

    /// An increment would push stock above the beer's capacity.
    #[error(
        "Beer with ID {id} has quantity greater than stock capacity. Quantity to increment {amount}"
    )]
    StockExceeded { id: BeerId, amount: i64 },

    /// A decrement would push stock below zero.
    #[error("Beer with ID {id} has quantity less than zero. Quantity to decrement {amount}")]
    StockBelowZero { id: BeerId, amount: i64 },

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered(name.into())
    }

    pub fn beer_not_found_by_name(name: &str) -> Self {
        Self::NotFound(format!("Beer with name {name} not found in the system."))
    }

    pub fn beer_not_found_by_id(id: BeerId) -> Self {
        Self::NotFound(format!("Beer with id {id} not found in the system."))
    }
}
