use std::sync::Arc;

use beerstock_infra::StockService;
use beerstock_infra::store::{BeerStore, InMemoryBeerStore};

use crate::config::ApiConfig;

/// Stock service over a type-erased store, so routes don't care which backend is wired.
pub type DynStockService = StockService<Arc<dyn BeerStore>>;

/// Which entity store backs the running service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres,
}

pub struct AppServices {
    backend: StoreBackend,
    stock: DynStockService,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let store: Arc<dyn BeerStore> = Arc::new(InMemoryBeerStore::new());
        Self {
            backend: StoreBackend::InMemory,
            stock: StockService::new(store),
        }
    }

    #[cfg(feature = "postgres")]
    pub async fn postgres(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        use anyhow::Context;
        use beerstock_infra::store::PostgresBeerStore;

        let store = PostgresBeerStore::connect(database_url, max_connections)
            .await
            .context("failed to connect to postgres")?;
        store
            .ensure_schema()
            .await
            .context("failed to create beers schema")?;

        let store: Arc<dyn BeerStore> = Arc::new(store);
        Ok(Self {
            backend: StoreBackend::Postgres,
            stock: StockService::new(store),
        })
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }

    pub fn stock(&self) -> &DynStockService {
        &self.stock
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        #[cfg(feature = "postgres")]
        {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("USE_PERSISTENT_STORES=true requires DATABASE_URL"))?;
            return AppServices::postgres(url, config.database_max_connections).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
        }
    }

    Ok(AppServices::in_memory())
}
