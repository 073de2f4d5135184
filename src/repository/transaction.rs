use diesel::prelude::*;

use crate::{
    domain::money::Money,
    domain::transaction::{
        NewTransaction as DomainNewTransaction, PricePolicy, Transaction as DomainTransaction,
        TransactionListQuery, TransactionPatch, line_total,
    },
    models::product::Product as DbProduct,
    models::transaction::{
        NewTransaction as DbNewTransaction, RepricedTransaction, Transaction as DbTransaction,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, TransactionReader, TransactionWriter, contains_pattern},
};

impl TransactionReader for DieselRepository {
    fn get_transaction_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTransaction>> {
        use crate::schema::{products, transactions};

        let mut conn = self.conn()?;
        let row = transactions::table
            .inner_join(products::table)
            .filter(transactions::id.eq(id))
            .filter(transactions::deleted_at.is_null())
            .select((DbTransaction::as_select(), DbProduct::as_select()))
            .first::<(DbTransaction, DbProduct)>(&mut conn)
            .optional()?;

        Ok(row.map(Into::into))
    }

    fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> RepositoryResult<Vec<DomainTransaction>> {
        use crate::schema::{products, transactions};

        let mut conn = self.conn()?;

        let TransactionListQuery {
            product_id,
            created_from,
            search,
            include_deleted,
        } = query;

        let mut items = transactions::table
            .inner_join(products::table)
            .select((DbTransaction::as_select(), DbProduct::as_select()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !include_deleted {
            items = items.filter(transactions::deleted_at.is_null());
        }

        if let Some(product_id) = product_id {
            items = items.filter(transactions::product_id.eq(product_id));
        }

        if let Some(created_from) = created_from {
            items = items.filter(transactions::created_at.ge(created_from));
        }

        if let Some(term) = search.as_ref() {
            let pattern = contains_pattern(term);
            items = items.filter(
                transactions::buyer_name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(products::name.like(pattern).escape('\\')),
            );
        }

        let rows = items
            .order(transactions::id.asc())
            .load::<(DbTransaction, DbProduct)>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl TransactionWriter for DieselRepository {
    fn create_transaction(
        &self,
        new_transaction: &DomainNewTransaction,
    ) -> RepositoryResult<DomainTransaction> {
        use crate::schema::{products, transactions};

        let mut conn = self.conn()?;
        let db_new = DbNewTransaction::from(new_transaction);

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(transactions::table)
                .values(&db_new)
                .get_result::<DbTransaction>(conn)?;

            let product = products::table
                .find(created.product_id)
                .first::<DbProduct>(conn)?;

            Ok(created.into_domain(product))
        })
    }

    fn patch_transaction(
        &self,
        transaction_id: i32,
        patch: &TransactionPatch,
        policy: PricePolicy,
    ) -> RepositoryResult<DomainTransaction> {
        use crate::schema::{products, transactions};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let current = transactions::table
                .filter(transactions::id.eq(transaction_id))
                .filter(transactions::deleted_at.is_null())
                .first::<DbTransaction>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let product = products::table
                .find(current.product_id)
                .first::<DbProduct>(conn)?;

            let quantity = patch.quantity.unwrap_or(current.quantity);
            let price = policy.unit_price(
                Money::from_cents(current.price_cents),
                Money::from_cents(product.price_cents),
            );
            let total = line_total(quantity, price)?;

            let changes = RepricedTransaction {
                buyer_name: patch
                    .buyer_name
                    .as_deref()
                    .unwrap_or(current.buyer_name.as_str()),
                quantity,
                price_cents: price.cents(),
                total_cents: total.cents(),
                updated_at: chrono::Local::now().naive_utc(),
            };

            let updated = diesel::update(transactions::table.find(current.id))
                .set(&changes)
                .get_result::<DbTransaction>(conn)?;

            Ok(updated.into_domain(product))
        })
    }

    fn delete_transaction(&self, transaction_id: i32) -> RepositoryResult<()> {
        use crate::schema::transactions;

        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        let target = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::deleted_at.is_null());

        let deleted = diesel::update(target)
            .set((
                transactions::deleted_at.eq(Some(now)),
                transactions::updated_at.eq(now),
            ))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
