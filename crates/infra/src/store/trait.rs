use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use beerstock_core::{BeerId, ExpectedVersion};
use beerstock_inventory::{Beer, NewBeer};

/// Entity store operation error.
///
/// These are **infrastructure errors** (uniqueness, concurrency, backend
/// failures) as opposed to domain errors (validation, stock bounds).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a beer named {0:?} is already stored")]
    DuplicateName(String),

    #[error("beer {0} is not stored")]
    NotFound(BeerId),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Persistence abstraction holding beer records keyed by identifier, with a
/// secondary uniqueness index on `name`.
///
/// ## Implementation Requirements
///
/// - `insert_if_absent` checks the name index and inserts in one atomic step;
///   identifiers are assigned by the store.
/// - `update` is a compare-and-swap against the stored `version`; a successful
///   write returns the next revision.
/// - `find_all` returns records in identifier (insertion) order.
#[async_trait]
pub trait BeerStore: Send + Sync {
    /// Insert a new beer unless one with the same name exists.
    async fn insert_if_absent(&self, beer: NewBeer) -> Result<Beer, StoreError>;

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError>;

    /// Persist the stock of `beer` if the stored revision matches `expected_version`.
    async fn update(&self, beer: Beer, expected_version: ExpectedVersion)
    -> Result<Beer, StoreError>;

    /// Remove a beer. Returns `false` when nothing was stored under `id`.
    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> BeerStore for Arc<S>
where
    S: BeerStore + ?Sized,
{
    async fn insert_if_absent(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        (**self).insert_if_absent(beer).await
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        (**self).find_all().await
    }

    async fn update(
        &self,
        beer: Beer,
        expected_version: ExpectedVersion,
    ) -> Result<Beer, StoreError> {
        (**self).update(beer, expected_version).await
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        (**self).delete_by_id(id).await
    }
}
