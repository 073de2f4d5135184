use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::transaction::{
    NewTransaction, PricePolicy, Transaction, TransactionListQuery, TransactionPatch,
};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod product;
pub mod transaction;

#[cfg(test)]
pub mod mock;

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` taken
/// literally. Pair with `.escape('\\')`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    /// Fetch a live product. Soft-deleted rows yield `None`.
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    /// Soft-delete a live product, `RepositoryError::NotFound` otherwise.
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over transaction records. Returned transactions
/// carry their product, even when that product has been soft-deleted.
pub trait TransactionReader {
    fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>>;
    fn list_transactions(&self, query: TransactionListQuery)
    -> RepositoryResult<Vec<Transaction>>;
}

/// Write operations over transaction records.
pub trait TransactionWriter {
    fn create_transaction(&self, new_transaction: &NewTransaction)
    -> RepositoryResult<Transaction>;
    /// Apply `patch` and re-derive price and total in one store transaction.
    fn patch_transaction(
        &self,
        transaction_id: i32,
        patch: &TransactionPatch,
        policy: PricePolicy,
    ) -> RepositoryResult<Transaction>;
    fn delete_transaction(&self, transaction_id: i32) -> RepositoryResult<()>;
}
