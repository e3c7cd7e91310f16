use serde::{Deserialize, Serialize};

use beerstock_core::DomainError;
use beerstock_inventory::{Beer, BeerType, NewBeer};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/v1/beers`.
///
/// Every field is optional on the wire so that missing fields surface as
/// validation errors (400) instead of deserialization failures.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBeerRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub max: Option<i64>,
    pub quantity: Option<i64>,
    #[serde(rename = "type")]
    pub beer_type: Option<String>,
}

/// Body of `PATCH /api/v1/beers/{id}/increment|decrement`.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityRequest {
    pub quantity: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub max: i64,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
}

// -------------------------
// Mapping
// -------------------------

fn required<T>(field: &str, value: Option<T>) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

pub fn to_new_beer(req: CreateBeerRequest) -> Result<NewBeer, DomainError> {
    let beer_type: BeerType = required("type", req.beer_type)?.parse()?;
    Ok(NewBeer {
        name: required("name", req.name)?,
        brand: required("brand", req.brand)?,
        max: required("max", req.max)?,
        quantity: required("quantity", req.quantity)?,
        beer_type,
    })
}

pub fn to_amount(req: QuantityRequest) -> Result<i64, DomainError> {
    required("quantity", req.quantity)
}

impl From<&Beer> for BeerResponse {
    fn from(beer: &Beer) -> Self {
        Self {
            id: beer.id_typed().as_i64(),
            name: beer.name().to_string(),
            brand: beer.brand().to_string(),
            max: beer.max(),
            quantity: beer.quantity(),
            beer_type: beer.beer_type(),
        }
    }
}
