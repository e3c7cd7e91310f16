//! Postgres-backed beer store.
//!
//! Maps to the `beers` table. Name uniqueness is a table constraint, so
//! insert-if-absent is a single `INSERT ... ON CONFLICT DO NOTHING`; stock
//! updates are a single conditional `UPDATE` on `version`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use beerstock_core::{BeerId, ExpectedVersion, Versioned};
use beerstock_inventory::{Beer, BeerType, NewBeer};

use super::r#trait::{BeerStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL UNIQUE,
    brand VARCHAR(200) NOT NULL,
    max_quantity BIGINT NOT NULL CHECK (max_quantity >= 1),
    quantity BIGINT NOT NULL CHECK (quantity >= 0 AND quantity <= max_quantity),
    beer_type VARCHAR(16) NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const COLUMNS: &str = "id, name, brand, max_quantity, quantity, beer_type, version";

/// Postgres-backed implementation of [`BeerStore`].
///
/// Uses a SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: PgPool,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(backend)?;
        Ok(Self::new(pool))
    }

    /// Create the `beers` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn beer_from_row(row: &PgRow) -> Result<Beer, StoreError> {
    let id: i64 = row.try_get("id").map_err(backend)?;
    let beer_type: String = row.try_get("beer_type").map_err(backend)?;
    let beer_type: BeerType = beer_type
        .parse()
        .map_err(|e| StoreError::Backend(format!("beer {id}: {e}")))?;
    let version: i64 = row.try_get("version").map_err(backend)?;

    let fields = NewBeer {
        name: row.try_get("name").map_err(backend)?,
        brand: row.try_get("brand").map_err(backend)?,
        max: row.try_get("max_quantity").map_err(backend)?,
        quantity: row.try_get("quantity").map_err(backend)?,
        beer_type,
    };
    Ok(Beer::restore(BeerId::new(id), fields, version as u64))
}

#[async_trait]
impl BeerStore for PostgresBeerStore {
    async fn insert_if_absent(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO beers (name, brand, max_quantity, quantity, beer_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&beer.name)
            .bind(&beer.brand)
            .bind(beer.max)
            .bind(beer.quantity)
            .bind(beer.beer_type.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        match row {
            Some(row) => beer_from_row(&row),
            None => Err(StoreError::DuplicateName(beer.name)),
        }
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM beers WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(beer_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM beers WHERE name = $1");
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(beer_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM beers ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(beer_from_row).collect()
    }

    async fn update(
        &self,
        beer: Beer,
        expected_version: ExpectedVersion,
    ) -> Result<Beer, StoreError> {
        let id = beer.id_typed();
        let expected: Option<i64> = match expected_version {
            ExpectedVersion::Any => None,
            ExpectedVersion::Exact(v) => Some(v as i64),
        };

        let sql = format!(
            r#"
            UPDATE beers
            SET quantity = $1, version = version + 1, updated_at = NOW()
            WHERE id = $2 AND ($3::BIGINT IS NULL OR version = $3)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(beer.quantity())
            .bind(id.as_i64())
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        if let Some(row) = row {
            return beer_from_row(&row);
        }

        // Nothing matched: either the beer is gone or its version moved on.
        match self.find_by_id(id).await? {
            Some(current) => Err(StoreError::Concurrency(format!(
                "beer {id}: expected {expected_version:?}, found {}",
                current.version()
            ))),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }
}
