//! Stock service: validation and business-rule orchestration over a [`BeerStore`].
//!
//! Every operation is one read (or existence check) followed by at most one write:
//!
//! ```text
//! request
//!   ↓
//! 1. Validate input (pure domain rules)
//!   ↓
//! 2. Load current state from the store
//!   ↓
//! 3. Decide (pure: `Beer::incremented` / `Beer::decremented`)
//!   ↓
//! 4. Persist with an optimistic version check
//! ```
//!
//! Uniqueness on create is delegated to the store's atomic insert-if-absent, and
//! stock writes are compare-and-swap against the version read in step 2, so
//! concurrent adjustments cannot break `0 <= quantity <= max`. Lost races are
//! reported as [`StockServiceError::Concurrency`]; nothing is retried here.

use thiserror::Error;
use tracing::{info, warn};

use beerstock_core::{BeerId, DomainError, ExpectedVersion, Versioned};
use beerstock_inventory::{Beer, NewBeer};

use crate::store::{BeerStore, StoreError};

#[derive(Debug, Error)]
pub enum StockServiceError {
    /// Missing/empty/out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// Duplicate name on create.
    #[error("{0}")]
    AlreadyRegistered(String),
    /// Unknown id or name.
    #[error("{0}")]
    NotFound(String),
    #[error(
        "Beer with ID {id} has quantity greater than stock capacity. Quantity to increment {amount}"
    )]
    StockExceeded { id: BeerId, amount: i64 },
    #[error("Beer with ID {id} has quantity less than zero. Quantity to decrement {amount}")]
    StockBelowZero { id: BeerId, amount: i64 },
    /// Optimistic concurrency failure (stock changed between read and write).
    #[error("{0}")]
    Concurrency(String),
    /// Store backend failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for StockServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => StockServiceError::Validation(msg),
            DomainError::InvalidId(msg) => StockServiceError::Validation(msg),
            DomainError::NotFound(msg) => StockServiceError::NotFound(msg),
            e @ DomainError::AlreadyRegistered(_) => {
                StockServiceError::AlreadyRegistered(e.to_string())
            }
            DomainError::StockExceeded { id, amount } => {
                StockServiceError::StockExceeded { id, amount }
            }
            DomainError::StockBelowZero { id, amount } => {
                StockServiceError::StockBelowZero { id, amount }
            }
            DomainError::Conflict(msg) => StockServiceError::Concurrency(msg),
        }
    }
}

impl From<StoreError> for StockServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateName(name) => DomainError::already_registered(name).into(),
            StoreError::NotFound(id) => DomainError::beer_not_found_by_id(id).into(),
            StoreError::Concurrency(msg) => StockServiceError::Concurrency(msg),
            e @ StoreError::Backend(_) => StockServiceError::Store(e),
        }
    }
}

/// Direction of a stock adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Adjustment {
    Increment,
    Decrement,
}

/// Business-rule layer for the beer stock.
#[derive(Debug)]
pub struct StockService<S> {
    store: S,
}

impl<S> StockService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> StockService<S>
where
    S: BeerStore,
{
    /// Validate and store a new beer. The store assigns the identifier.
    pub async fn create_beer(&self, input: NewBeer) -> Result<Beer, StockServiceError> {
        input.validate()?;

        match self.store.insert_if_absent(input).await {
            Ok(beer) => {
                info!(beer_id = %beer.id_typed(), name = beer.name(), quantity = beer.quantity(), "beer created");
                Ok(beer)
            }
            Err(StoreError::DuplicateName(name)) => {
                warn!(name = %name, "beer already registered");
                Err(DomainError::already_registered(name).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Beer, StockServiceError> {
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty").into());
        }

        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::beer_not_found_by_name(name).into())
    }

    pub async fn list_all(&self) -> Result<Vec<Beer>, StockServiceError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn delete_by_id(&self, id: BeerId) -> Result<(), StockServiceError> {
        self.verify_if_exists(id).await?;

        if !self.store.delete_by_id(id).await? {
            // Removed concurrently between the check and the delete.
            return Err(DomainError::beer_not_found_by_id(id).into());
        }

        info!(beer_id = %id, "beer deleted");
        Ok(())
    }

    /// Add `amount` units of stock, bounded by the beer's `max`.
    pub async fn increment(&self, id: BeerId, amount: i64) -> Result<Beer, StockServiceError> {
        self.adjust(id, amount, Adjustment::Increment).await
    }

    /// Remove `amount` units of stock, bounded below by zero.
    pub async fn decrement(&self, id: BeerId, amount: i64) -> Result<Beer, StockServiceError> {
        self.adjust(id, amount, Adjustment::Decrement).await
    }

    async fn adjust(
        &self,
        id: BeerId,
        amount: i64,
        direction: Adjustment,
    ) -> Result<Beer, StockServiceError> {
        beerstock_inventory::validate_adjustment(amount)?;

        let current = self.verify_if_exists(id).await?;
        let decided = match direction {
            Adjustment::Increment => current.incremented(amount),
            Adjustment::Decrement => current.decremented(amount),
        };

        let adjusted = match decided {
            Ok(beer) => beer,
            Err(e) => {
                warn!(
                    beer_id = %id,
                    amount,
                    quantity = current.quantity(),
                    max = current.max(),
                    error = %e,
                    "stock adjustment rejected"
                );
                return Err(e.into());
            }
        };

        let saved = self
            .store
            .update(adjusted, ExpectedVersion::Exact(current.version()))
            .await?;

        info!(
            beer_id = %id,
            amount,
            direction = ?direction,
            quantity = saved.quantity(),
            "stock adjusted"
        );
        Ok(saved)
    }

    async fn verify_if_exists(&self, id: BeerId) -> Result<Beer, StockServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::beer_not_found_by_id(id).into())
    }
}
