use core::str::FromStr;

use serde::{Deserialize, Serialize};

use beerstock_core::{BeerId, DomainError, DomainResult, Entity, Versioned};

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_BRAND_LEN: usize = 200;
/// Upper bound for a beer's storage capacity (`max`).
pub const MAX_CAPACITY: i64 = 500;

/// Closed set of beer styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BeerType {
    Lager,
    Malzbier,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
}

impl BeerType {
    pub const ALL: [BeerType; 7] = [
        BeerType::Lager,
        BeerType::Malzbier,
        BeerType::Witbier,
        BeerType::Weiss,
        BeerType::Ale,
        BeerType::Ipa,
        BeerType::Stout,
    ];

    /// Wire name (upper-case).
    pub fn as_str(&self) -> &'static str {
        match self {
            BeerType::Lager => "LAGER",
            BeerType::Malzbier => "MALZBIER",
            BeerType::Witbier => "WITBIER",
            BeerType::Weiss => "WEISS",
            BeerType::Ale => "ALE",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "STOUT",
        }
    }

    /// Human-readable label.
    pub fn description(&self) -> &'static str {
        match self {
            BeerType::Lager => "Lager",
            BeerType::Malzbier => "Malzbier",
            BeerType::Witbier => "Witbier",
            BeerType::Weiss => "Weiss",
            BeerType::Ale => "Ale",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "Stout",
        }
    }
}

impl core::fmt::Display for BeerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = BeerType::ALL.iter().map(|t| t.as_str()).collect();
                DomainError::validation(format!(
                    "type must be one of: {} (got {s:?})",
                    allowed.join(", ")
                ))
            })
    }
}

/// Candidate beer record, before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeer {
    pub name: String,
    pub brand: String,
    pub max: i64,
    pub quantity: i64,
    pub beer_type: BeerType,
}

impl NewBeer {
    /// Check required fields and stock bounds.
    pub fn validate(&self) -> DomainResult<()> {
        validate_text("name", &self.name, MAX_NAME_LEN)?;
        validate_text("brand", &self.brand, MAX_BRAND_LEN)?;

        if self.max < 1 || self.max > MAX_CAPACITY {
            return Err(DomainError::validation(format!(
                "max must be between 1 and {MAX_CAPACITY}"
            )));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if self.quantity > self.max {
            return Err(DomainError::validation("quantity cannot exceed max"));
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str, max_len: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{field} cannot be longer than {max_len} characters"
        )));
    }
    Ok(())
}

/// Stock adjustments must move at least one unit.
pub fn validate_adjustment(amount: i64) -> DomainResult<()> {
    if amount < 1 {
        return Err(DomainError::validation("quantity must be greater than zero"));
    }
    Ok(())
}

/// Entity: a stored beer with its current stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    id: BeerId,
    name: String,
    brand: String,
    max: i64,
    quantity: i64,
    beer_type: BeerType,
    version: u64,
}

impl Beer {
    /// Materialize the first revision of a freshly stored beer.
    pub fn from_new(id: BeerId, new: NewBeer) -> Self {
        Self::restore(id, new, 1)
    }

    /// Rebuild a beer from persisted fields.
    pub fn restore(id: BeerId, fields: NewBeer, version: u64) -> Self {
        Self {
            id,
            name: fields.name,
            brand: fields.brand,
            max: fields.max,
            quantity: fields.quantity,
            beer_type: fields.beer_type,
            version,
        }
    }

    pub fn id_typed(&self) -> BeerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn beer_type(&self) -> BeerType {
        self.beer_type
    }

    /// Add stock. Returns the adjusted beer; `self` is left untouched.
    pub fn incremented(&self, amount: i64) -> DomainResult<Beer> {
        validate_adjustment(amount)?;

        let exceeded = DomainError::StockExceeded {
            id: self.id,
            amount,
        };
        let new_quantity = self.quantity.checked_add(amount).ok_or(exceeded.clone())?;
        if new_quantity > self.max {
            return Err(exceeded);
        }

        Ok(self.with_quantity(new_quantity))
    }

    /// Remove stock. Returns the adjusted beer; `self` is left untouched.
    pub fn decremented(&self, amount: i64) -> DomainResult<Beer> {
        validate_adjustment(amount)?;

        let new_quantity = self.quantity - amount;
        if new_quantity < 0 {
            return Err(DomainError::StockBelowZero {
                id: self.id,
                amount,
            });
        }

        Ok(self.with_quantity(new_quantity))
    }

    /// The revision a store writes after accepting this state.
    pub fn next_revision(mut self) -> Beer {
        self.version += 1;
        self
    }

    fn with_quantity(&self, quantity: i64) -> Beer {
        Beer {
            quantity,
            ..self.clone()
        }
    }
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for Beer {
    fn version(&self) -> u64 {
        self.version
    }
}
