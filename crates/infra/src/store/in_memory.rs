use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use beerstock_core::{BeerId, Entity, ExpectedVersion, Versioned};
use beerstock_inventory::{Beer, NewBeer};

use super::r#trait::{BeerStore, StoreError};

#[derive(Debug)]
struct Tables {
    beers: BTreeMap<BeerId, Beer>,
    by_name: HashMap<String, BeerId>,
    last_id: BeerId,
}

/// In-memory beer store.
///
/// Intended for tests/dev. Every mutation (including the name index) happens
/// under a single write lock, so insert-if-absent and compare-and-swap are atomic.
#[derive(Debug)]
pub struct InMemoryBeerStore {
    tables: RwLock<Tables>,
}

impl InMemoryBeerStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                beers: BTreeMap::new(),
                by_name: HashMap::new(),
                last_id: BeerId::new(0),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

impl Default for InMemoryBeerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BeerStore for InMemoryBeerStore {
    async fn insert_if_absent(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let mut tables = self.write()?;

        if tables.by_name.contains_key(&beer.name) {
            return Err(StoreError::DuplicateName(beer.name));
        }

        let id = tables.last_id.next();
        tables.last_id = id;

        let stored = Beer::from_new(id, beer);
        tables.by_name.insert(stored.name().to_string(), id);
        tables.beers.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        Ok(self.read()?.beers.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .by_name
            .get(name)
            .and_then(|id| tables.beers.get(id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        Ok(self.read()?.beers.values().cloned().collect())
    }

    async fn update(
        &self,
        beer: Beer,
        expected_version: ExpectedVersion,
    ) -> Result<Beer, StoreError> {
        let mut tables = self.write()?;
        let id = *beer.id();

        let current = tables.beers.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if !expected_version.matches(current.version()) {
            let (id, found) = current.revision();
            return Err(StoreError::Concurrency(format!(
                "beer {id}: expected {expected_version:?}, found {found}"
            )));
        }

        // Only stock is mutable; identity and descriptive fields stay as stored.
        let fields = NewBeer {
            name: current.name().to_string(),
            brand: current.brand().to_string(),
            max: current.max(),
            quantity: beer.quantity(),
            beer_type: current.beer_type(),
        };
        let next = Beer::restore(id, fields, current.version()).next_revision();
        *current = next.clone();
        Ok(next)
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        match tables.beers.remove(&id) {
            Some(removed) => {
                tables.by_name.remove(removed.name());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beerstock_inventory::BeerType;

    fn new_beer(name: &str) -> NewBeer {
        NewBeer {
            name: name.to_string(),
            brand: "Ambev".to_string(),
            max: 50,
            quantity: 10,
            beer_type: BeerType::Lager,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_starting_at_one() {
        let store = InMemoryBeerStore::new();
        let a = store.insert_if_absent(new_beer("Brahma")).await.unwrap();
        let b = store.insert_if_absent(new_beer("Skol")).await.unwrap();

        assert_eq!(a.id_typed(), BeerId::new(1));
        assert_eq!(b.id_typed(), BeerId::new(2));
        assert_eq!(a.version(), 1);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_without_consuming_an_id() {
        let store = InMemoryBeerStore::new();
        store.insert_if_absent(new_beer("Brahma")).await.unwrap();

        let err = store.insert_if_absent(new_beer("Brahma")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "Brahma"));

        let next = store.insert_if_absent(new_beer("Skol")).await.unwrap();
        assert_eq!(next.id_typed(), BeerId::new(2));
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let store = InMemoryBeerStore::new();
        store.insert_if_absent(new_beer("Brahma")).await.unwrap();
        store.insert_if_absent(new_beer("brahma")).await.unwrap();

        assert!(store.find_by_name("BRAHMA").await.unwrap().is_none());
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn find_all_is_in_insertion_order() {
        let store = InMemoryBeerStore::new();
        for name in ["c", "a", "b"] {
            store.insert_if_absent(new_beer(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn update_is_a_compare_and_swap_on_version() {
        let store = InMemoryBeerStore::new();
        let beer = store.insert_if_absent(new_beer("Brahma")).await.unwrap();

        let adjusted = beer.incremented(5).unwrap();
        let saved = store
            .update(adjusted.clone(), ExpectedVersion::Exact(1))
            .await
            .unwrap();
        assert_eq!(saved.quantity(), 15);
        assert_eq!(saved.version(), 2);

        // Same stale revision again: rejected, stored state unchanged.
        let err = store
            .update(adjusted, ExpectedVersion::Exact(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));

        let current = store.find_by_id(beer.id_typed()).await.unwrap().unwrap();
        assert_eq!(current.quantity(), 15);
        assert_eq!(current.version(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_beer_is_not_found() {
        let store = InMemoryBeerStore::new();
        let ghost = Beer::from_new(BeerId::new(9), new_beer("Ghost"));
        let err = store.update(ghost, ExpectedVersion::Any).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == BeerId::new(9)));
    }

    #[tokio::test]
    async fn delete_frees_the_name() {
        let store = InMemoryBeerStore::new();
        let beer = store.insert_if_absent(new_beer("Brahma")).await.unwrap();

        assert!(store.delete_by_id(beer.id_typed()).await.unwrap());
        assert!(!store.delete_by_id(beer.id_typed()).await.unwrap());
        assert!(store.find_by_name("Brahma").await.unwrap().is_none());

        let again = store.insert_if_absent(new_beer("Brahma")).await.unwrap();
        assert_eq!(again.id_typed(), BeerId::new(2));
    }
}
