use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::money::Money;
use crate::domain::product::Product;

/// Maximum allowed length for a buyer name.
pub const BUYER_NAME_MAX_LEN: usize = 100;

/// Errors raised while deriving a transaction total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("total for quantity {quantity} at unit price {price} is out of range")]
    TotalOverflow { quantity: i32, price: Money },
}

/// `quantity × price`, refusing totals that cannot be stored and rendered
/// exactly.
pub fn line_total(quantity: i32, price: Money) -> Result<Money, PricingError> {
    price
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::TotalOverflow { quantity, price })
}

/// Decides which unit price a transaction carries after it is patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Refresh the snapshot from the product's current price on every update.
    #[default]
    Current,
    /// Keep the price captured when the transaction was created.
    Frozen,
}

impl PricePolicy {
    /// Unit price to store given the existing `snapshot` and the product's
    /// `current` price.
    pub fn unit_price(self, snapshot: Money, current: Money) -> Money {
        match self {
            PricePolicy::Current => current,
            PricePolicy::Frozen => snapshot,
        }
    }
}

impl fmt::Display for PricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePolicy::Current => f.write_str("current"),
            PricePolicy::Frozen => f.write_str("frozen"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price policy `{0}`, expected `current` or `frozen`")]
pub struct UnknownPricePolicy(pub String);

impl FromStr for PricePolicy {
    type Err = UnknownPricePolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(PricePolicy::Current),
            "frozen" => Ok(PricePolicy::Frozen),
            _ => Err(UnknownPricePolicy(value.to_string())),
        }
    }
}

/// A sale of one product, with the product embedded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub buyer_name: String,
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price snapshot taken from the product.
    pub price: Money,
    /// Always `quantity × price`.
    pub total: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
    pub product: Product,
}

/// Payload required to insert a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub buyer_name: String,
    pub product_id: i32,
    pub quantity: i32,
    pub price: Money,
    pub total: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewTransaction {
    /// Price a sale of `quantity` units of `product` at its current price.
    pub fn for_product(
        buyer_name: impl Into<String>,
        product: &Product,
        quantity: i32,
    ) -> Result<Self, PricingError> {
        let total = line_total(quantity, product.price)?;
        let now = chrono::Local::now().naive_utc();
        Ok(Self {
            buyer_name: buyer_name.into(),
            product_id: product.id,
            quantity,
            price: product.price,
            total,
            created_at: now,
            updated_at: now,
        })
    }

    /// Override the creation timestamp, e.g. when backfilling history.
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Partial update of a transaction. Only these two fields are patchable;
/// price and total are always derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub buyer_name: Option<String>,
    pub quantity: Option<i32>,
}

impl TransactionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buyer_name(mut self, buyer_name: impl Into<String>) -> Self {
        self.buyer_name = Some(buyer_name.into());
        self
    }

    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buyer_name.is_none() && self.quantity.is_none()
    }
}

/// Result of a patch request.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    /// The patch carried no fields; the stored record is returned as is.
    Unchanged(Transaction),
    Updated(Transaction),
}

impl PatchOutcome {
    pub fn transaction(&self) -> &Transaction {
        match self {
            PatchOutcome::Unchanged(transaction) | PatchOutcome::Updated(transaction) => {
                transaction
            }
        }
    }
}

/// Query definition used to list transactions. All filters are combined
/// with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionListQuery {
    /// Only transactions of this product.
    pub product_id: Option<i32>,
    /// Only transactions created at or after this instant (UTC).
    pub created_from: Option<NaiveDateTime>,
    /// Case-insensitive substring of the buyer name or the product name.
    pub search: Option<String>,
    /// Whether soft-deleted transactions should be included.
    pub include_deleted: bool,
}

impl TransactionListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn created_from(mut self, created_from: NaiveDateTime) -> Self {
        self.created_from = Some(created_from);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }
}
