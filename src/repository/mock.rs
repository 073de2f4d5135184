use mockall::mock;

use super::{ProductReader, ProductWriter, TransactionReader, TransactionWriter};
use crate::domain::{
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    transaction::{NewTransaction, PricePolicy, Transaction, TransactionListQuery, TransactionPatch},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub TransactionReader {}

    impl TransactionReader for TransactionReader {
        fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>>;
        fn list_transactions(&self, query: TransactionListQuery) -> RepositoryResult<Vec<Transaction>>;
    }
}

mock! {
    pub TransactionWriter {}

    impl TransactionWriter for TransactionWriter {
        fn create_transaction(&self, new_transaction: &NewTransaction) -> RepositoryResult<Transaction>;
        fn patch_transaction(&self, transaction_id: i32, patch: &TransactionPatch, policy: PricePolicy) -> RepositoryResult<Transaction>;
        fn delete_transaction(&self, transaction_id: i32) -> RepositoryResult<()>;
    }
}

// Reads and writes on one repository, for services bounded by several traits.
mock! {
    pub Repository {}

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }

    impl TransactionReader for Repository {
        fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<Transaction>>;
        fn list_transactions(&self, query: TransactionListQuery) -> RepositoryResult<Vec<Transaction>>;
    }

    impl TransactionWriter for Repository {
        fn create_transaction(&self, new_transaction: &NewTransaction) -> RepositoryResult<Transaction>;
        fn patch_transaction(&self, transaction_id: i32, patch: &TransactionPatch, policy: PricePolicy) -> RepositoryResult<Transaction>;
        fn delete_transaction(&self, transaction_id: i32) -> RepositoryResult<()>;
    }
}
