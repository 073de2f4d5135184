use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::money::Money;
use crate::domain::transaction::{
    NewTransaction as DomainNewTransaction, Transaction as DomainTransaction,
};
use crate::models::product::Product;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
pub struct Transaction {
    pub id: i32,
    pub buyer_name: String,
    pub product_id: i32,
    pub quantity: i32,
    pub price_cents: i64,
    pub total_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction<'a> {
    pub buyer_name: &'a str,
    pub product_id: i32,
    pub quantity: i32,
    pub price_cents: i64,
    pub total_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full rewrite of the mutable columns, applied in a single statement.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::transactions)]
pub struct RepricedTransaction<'a> {
    pub buyer_name: &'a str,
    pub quantity: i32,
    pub price_cents: i64,
    pub total_cents: i64,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    pub fn into_domain(self, product: Product) -> DomainTransaction {
        DomainTransaction {
            id: self.id,
            buyer_name: self.buyer_name,
            product_id: self.product_id,
            quantity: self.quantity,
            price: Money::from_cents(self.price_cents),
            total: Money::from_cents(self.total_cents),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            product: product.into(),
        }
    }
}

impl From<(Transaction, Product)> for DomainTransaction {
    fn from((transaction, product): (Transaction, Product)) -> Self {
        transaction.into_domain(product)
    }
}

impl<'a> From<&'a DomainNewTransaction> for NewTransaction<'a> {
    fn from(value: &'a DomainNewTransaction) -> Self {
        Self {
            buyer_name: value.buyer_name.as_str(),
            product_id: value.product_id,
            quantity: value.quantity,
            price_cents: value.price.cents(),
            total_cents: value.total.cents(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
