use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;

/// Upper bound on a product price: one trillion in major units.
pub const MAX_PRICE: Money = Money::from_cents(1_000_000_000_000 * 100);

/// Maximum allowed length for a product name.
pub const NAME_MAX_LEN: usize = 100;

/// Whether `price` lies in the accepted `(0, MAX_PRICE]` range.
pub fn is_valid_price(price: Money) -> bool {
    price > Money::ZERO && price <= MAX_PRICE
}

/// Domain representation of a sellable product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
    /// Set once the product has been soft-deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: name.into(),
            price,
            updated_at: now,
        }
    }
}

/// Patch data applied when updating an existing product. Fields left as
/// `None` keep their stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    /// Optional name update.
    pub name: Option<String>,
    /// Optional price update.
    pub price: Option<Money>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            price: None,
            updated_at: now,
        }
    }

    /// Update the product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the product price.
    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// True when the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Optional case-insensitive name substring.
    pub search: Option<String>,
    /// Whether soft-deleted products should be included in the results.
    pub include_deleted: bool,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to the name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include soft-deleted products in the results.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds_are_exclusive_at_zero_and_inclusive_at_max() {
        assert!(!is_valid_price(Money::ZERO));
        assert!(!is_valid_price(Money::from_cents(-1)));
        assert!(is_valid_price(Money::from_cents(1)));
        assert!(is_valid_price(MAX_PRICE));
        assert!(!is_valid_price(Money::from_cents(MAX_PRICE.cents() + 1)));
    }

    #[test]
    fn update_product_tracks_emptiness() {
        assert!(UpdateProduct::new().is_empty());
        assert!(!UpdateProduct::new().name("Widget").is_empty());
        assert!(!UpdateProduct::new().price(Money::from_cents(100)).is_empty());
    }
}
