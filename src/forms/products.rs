use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::money::Money;
use crate::domain::product::{NAME_MAX_LEN, NewProduct, UpdateProduct, is_valid_price};

const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Upper price bound in major units, as seen on the wire.
const PRICE_MAX: f64 = 1_000_000_000_000.0;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after trimming.
    #[error("name: name is required")]
    EmptyName,
    /// The price rounds to a value outside `(0, 1e12]`.
    #[error("price: price must be positive and at most 1 trillion")]
    InvalidPrice,
}

/// JSON payload of `POST /products`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddProductForm {
    #[validate(length(
        min = 1,
        max = NAME_MAX_LEN_VALIDATOR,
        message = "name is required and must be at most 100 characters"
    ))]
    pub name: String,
    #[validate(range(
        exclusive_min = 0.0,
        max = PRICE_MAX,
        message = "price must be positive and at most 1 trillion"
    ))]
    pub price: f64,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_name(&self.name)?;
        let price = parse_price(self.price)?;

        Ok(NewProduct::new(name, price))
    }
}

/// JSON payload of `PUT /products/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductForm {
    #[validate(length(
        min = 1,
        max = NAME_MAX_LEN_VALIDATOR,
        message = "name cannot be empty and must be at most 100 characters"
    ))]
    pub name: Option<String>,
    #[validate(range(
        exclusive_min = 0.0,
        max = PRICE_MAX,
        message = "price must be positive and at most 1 trillion"
    ))]
    pub price: Option<f64>,
}

impl UpdateProductForm {
    /// Validates the present fields and converts them into a patch.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name.as_deref() {
            updates = updates.name(sanitize_name(name)?);
        }

        if let Some(price) = self.price {
            updates = updates.price(parse_price(price)?);
        }

        Ok(updates)
    }
}

fn sanitize_name(input: &str) -> ProductFormResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ProductFormError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn parse_price(value: f64) -> ProductFormResult<Money> {
    Money::from_decimal(value)
        .filter(|price| is_valid_price(*price))
        .ok_or(ProductFormError::InvalidPrice)
}
