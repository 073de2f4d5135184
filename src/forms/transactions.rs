use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::transaction::{BUYER_NAME_MAX_LEN, TransactionPatch};

const BUYER_NAME_MAX_LEN_VALIDATOR: u64 = BUYER_NAME_MAX_LEN as u64;

pub type TransactionFormResult<T> = Result<T, TransactionFormError>;

#[derive(Debug, Error)]
pub enum TransactionFormError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("buyer_name: buyer name cannot be empty")]
    EmptyBuyerName,
}

/// JSON payload of `POST /transactions`. Price and total are never taken
/// from the client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddTransactionForm {
    #[validate(length(
        min = 1,
        max = BUYER_NAME_MAX_LEN_VALIDATOR,
        message = "buyer name is required and must be at most 100 characters"
    ))]
    pub buyer_name: String,
    #[validate(range(min = 1, message = "product id is required and must be positive"))]
    pub product_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

impl AddTransactionForm {
    /// Validate the payload and return it with the buyer name trimmed.
    pub fn validated(self) -> TransactionFormResult<Self> {
        self.validate()?;
        let buyer_name = sanitize_buyer_name(&self.buyer_name)?;
        Ok(Self { buyer_name, ..self })
    }
}

/// JSON payload of `PATCH /transactions/{id}`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTransactionForm {
    #[validate(length(
        min = 1,
        max = BUYER_NAME_MAX_LEN_VALIDATOR,
        message = "buyer name cannot be empty and must be at most 100 characters"
    ))]
    pub buyer_name: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: Option<i32>,
}

impl UpdateTransactionForm {
    /// Validates the present fields and converts them into a patch.
    pub fn into_patch(self) -> TransactionFormResult<TransactionPatch> {
        self.validate()?;

        let mut patch = TransactionPatch::new();
        if let Some(buyer_name) = self.buyer_name.as_deref() {
            patch = patch.buyer_name(sanitize_buyer_name(buyer_name)?);
        }
        if let Some(quantity) = self.quantity {
            patch = patch.quantity(quantity);
        }
        Ok(patch)
    }
}

fn sanitize_buyer_name(input: &str) -> TransactionFormResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TransactionFormError::EmptyBuyerName);
    }
    Ok(trimmed.to_string())
}
