use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::domain::transaction::{
    NewTransaction, PatchOutcome, PricePolicy, Transaction, TransactionListQuery,
};
use crate::forms::transactions::{AddTransactionForm, UpdateTransactionForm};
use crate::repository::{ProductReader, TransactionReader, TransactionWriter};
use crate::services::{ServiceError, ServiceResult, non_blank, not_found_as};

const TRANSACTION_NOT_FOUND: &str = "Transaction not found";
const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Query parameters accepted by `GET /transactions`. Kept as raw strings so
/// malformed values turn into our own validation errors.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub product_id: Option<String>,
    /// `YYYY-MM-DD`, inclusive, in the server's local calendar.
    pub start_date: Option<String>,
    /// Matches the buyer name or the product name.
    pub search: Option<String>,
}

/// Lists transactions matching every supplied filter.
pub fn list_transactions<R>(repo: &R, query: TransactionsQuery) -> ServiceResult<Vec<Transaction>>
where
    R: TransactionReader + ?Sized,
{
    let mut list_query = TransactionListQuery::new();

    if let Some(raw) = non_blank(query.product_id.as_deref()) {
        let product_id = raw.parse::<i32>().map_err(|_| {
            ServiceError::validation("Invalid product_id format (must be number)")
        })?;
        list_query = list_query.product_id(product_id);
    }

    if let Some(raw) = non_blank(query.start_date.as_deref()) {
        let date = parse_start_date(raw)?;
        list_query = list_query.created_from(local_midnight_as_utc(date));
    }

    if let Some(term) = non_blank(query.search.as_deref()) {
        list_query = list_query.search(term);
    }

    repo.list_transactions(list_query)
        .map_err(ServiceError::from)
}

pub fn get_transaction<R>(repo: &R, transaction_id: i32) -> ServiceResult<Transaction>
where
    R: TransactionReader + ?Sized,
{
    repo.get_transaction_by_id(transaction_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::not_found(TRANSACTION_NOT_FOUND))
}

/// Records a sale. Price and total are taken from the product as it is now.
pub fn create_transaction<R>(repo: &R, form: AddTransactionForm) -> ServiceResult<Transaction>
where
    R: ProductReader + TransactionWriter + ?Sized,
{
    let form = form
        .validated()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let product = repo
        .get_product_by_id(form.product_id)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::not_found(PRODUCT_NOT_FOUND))?;

    let new_transaction = NewTransaction::for_product(form.buyer_name, &product, form.quantity)
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let transaction = repo
        .create_transaction(&new_transaction)
        .map_err(|err| not_found_as(err.into(), PRODUCT_NOT_FOUND))?;
    log::info!(
        "Created transaction {} for product {}: {} x {} = {}",
        transaction.id,
        transaction.product_id,
        transaction.quantity,
        transaction.price,
        transaction.total
    );

    Ok(transaction)
}

/// Applies a partial update and re-derives price and total under `policy`.
///
/// A missing transaction is reported before the payload is validated. A
/// payload without fields is not an error: the stored record comes back as
/// [`PatchOutcome::Unchanged`].
pub fn update_transaction<R>(
    repo: &R,
    transaction_id: i32,
    form: UpdateTransactionForm,
    policy: PricePolicy,
) -> ServiceResult<PatchOutcome>
where
    R: TransactionReader + TransactionWriter + ?Sized,
{
    let current = get_transaction(repo, transaction_id)?;

    let patch = form
        .into_patch()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    if patch.is_empty() {
        return Ok(PatchOutcome::Unchanged(current));
    }

    let updated = repo
        .patch_transaction(transaction_id, &patch, policy)
        .map_err(|err| not_found_as(err.into(), TRANSACTION_NOT_FOUND))?;

    if updated.price != current.price {
        log::info!(
            "Transaction {} repriced from {} to {} ({} policy)",
            updated.id,
            current.price,
            updated.price,
            policy
        );
    }

    Ok(PatchOutcome::Updated(updated))
}

/// Soft-deletes a transaction.
pub fn delete_transaction<R>(repo: &R, transaction_id: i32) -> ServiceResult<()>
where
    R: TransactionWriter + ?Sized,
{
    repo.delete_transaction(transaction_id)
        .map_err(|err| not_found_as(err.into(), TRANSACTION_NOT_FOUND))?;
    log::info!("Deleted transaction {transaction_id}");
    Ok(())
}

fn parse_start_date(raw: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServiceError::validation("Invalid start_date format. Use YYYY-MM-DD"))
}

/// Start of `date` in local time, expressed as naive UTC like the stored
/// timestamps.
fn local_midnight_as_utc(date: NaiveDate) -> NaiveDateTime {
    let midnight = date.and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local).earliest() {
        Some(local) => local.naive_utc(),
        // Midnight skipped by a DST change.
        None => midnight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::money::Money;
    use crate::domain::product::Product;
    use crate::domain::transaction::TransactionPatch;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::{MockRepository, MockTransactionReader, MockTransactionWriter};

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn product(id: i32, name: &str, price_cents: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Money::from_cents(price_cents),
            created_at: datetime(),
            updated_at: datetime(),
            deleted_at: None,
        }
    }

    fn sale(id: i32, buyer: &str, product: Product, quantity: i32) -> Transaction {
        let price = product.price;
        Transaction {
            id,
            buyer_name: buyer.to_string(),
            product_id: product.id,
            quantity,
            price,
            total: Money::from_cents(price.cents() * i64::from(quantity)),
            created_at: datetime(),
            updated_at: datetime(),
            deleted_at: None,
            product,
        }
    }

    #[test]
    fn list_transactions_builds_conjunctive_query() {
        let mut repo = MockTransactionReader::new();
        repo.expect_list_transactions()
            .times(1)
            .withf(|query| {
                query.product_id == Some(3)
                    && query.search.as_deref() == Some("alice")
                    && query.created_from.is_some()
                    && !query.include_deleted
            })
            .returning(|_| Ok(Vec::new()));

        let query = TransactionsQuery {
            product_id: Some("3".to_string()),
            start_date: Some("2024-02-01".to_string()),
            search: Some("alice".to_string()),
        };

        assert!(list_transactions(&repo, query).expect("list").is_empty());
    }

    #[test]
    fn list_transactions_rejects_malformed_filters() {
        let repo = MockTransactionReader::new();

        let query = TransactionsQuery {
            start_date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list_transactions(&repo, query),
            Err(ServiceError::Validation(message)) if message.contains("start_date")
        ));

        let query = TransactionsQuery {
            product_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list_transactions(&repo, query),
            Err(ServiceError::Validation(message)) if message.contains("product_id")
        ));
    }

    #[test]
    fn start_date_covers_the_whole_local_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let from = local_midnight_as_utc(date);
        let local_start = from
            .and_utc()
            .with_timezone(&Local)
            .naive_local();

        assert_eq!(local_start.date(), date);
        assert_eq!(local_start.time(), NaiveTime::MIN);
    }

    #[test]
    fn create_transaction_snapshots_price_and_total() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id()
            .withf(|id| *id == 1)
            .returning(|id| Ok(Some(product(id, "Widget", 10_000))));
        repo.expect_create_transaction()
            .times(1)
            .withf(|new_transaction: &NewTransaction| {
                new_transaction.buyer_name == "Alice"
                    && new_transaction.quantity == 3
                    && new_transaction.price == Money::from_cents(10_000)
                    && new_transaction.total == Money::from_cents(30_000)
            })
            .returning(|_| Ok(sale(10, "Alice", product(1, "Widget", 10_000), 3)));

        let form = AddTransactionForm {
            buyer_name: "Alice".to_string(),
            product_id: 1,
            quantity: 3,
        };
        let transaction = create_transaction(&repo, form).expect("created");

        assert_eq!(transaction.total.to_string(), "300.00");
        assert_eq!(transaction.product.name, "Widget");
    }

    #[test]
    fn create_transaction_for_missing_product_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().returning(|_| Ok(None));
        repo.expect_create_transaction().times(0);

        let form = AddTransactionForm {
            buyer_name: "Alice".to_string(),
            product_id: 404,
            quantity: 1,
        };

        assert!(matches!(
            create_transaction(&repo, form),
            Err(ServiceError::NotFound(message)) if message == "Product not found"
        ));
    }

    #[test]
    fn create_transaction_validates_before_lookup() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().times(0);
        repo.expect_create_transaction().times(0);

        let form = AddTransactionForm {
            buyer_name: "Alice".to_string(),
            product_id: 1,
            quantity: 0,
        };

        assert!(matches!(
            create_transaction(&repo, form),
            Err(ServiceError::Validation(message)) if message.contains("quantity")
        ));
    }

    #[test]
    fn update_transaction_with_empty_patch_is_unchanged() {
        let mut repo = MockRepository::new();
        repo.expect_get_transaction_by_id()
            .returning(|id| Ok(Some(sale(id, "Alice", product(1, "Widget", 10_000), 3))));
        repo.expect_patch_transaction().times(0);

        let outcome = update_transaction(&repo, 8, UpdateTransactionForm::default(), PricePolicy::Current)
            .expect("soft success");

        match outcome {
            PatchOutcome::Unchanged(transaction) => assert_eq!(transaction.id, 8),
            other => panic!("expected unchanged outcome, got {other:?}"),
        }
    }

    #[test]
    fn update_transaction_forwards_patch_and_policy() {
        let mut repo = MockRepository::new();
        repo.expect_get_transaction_by_id()
            .returning(|id| Ok(Some(sale(id, "Alice", product(1, "Widget", 10_000), 3))));
        repo.expect_patch_transaction()
            .times(1)
            .withf(|id, patch: &TransactionPatch, policy| {
                *id == 8
                    && *patch == TransactionPatch::new().quantity(5)
                    && *policy == PricePolicy::Frozen
            })
            .returning(|id, _, _| Ok(sale(id, "Alice", product(1, "Widget", 10_000), 5)));

        let form = UpdateTransactionForm {
            buyer_name: None,
            quantity: Some(5),
        };
        let outcome = update_transaction(&repo, 8, form, PricePolicy::Frozen).expect("updated");

        assert!(matches!(outcome, PatchOutcome::Updated(_)));
        assert_eq!(outcome.transaction().total, Money::from_cents(50_000));
    }

    #[test]
    fn update_transaction_checks_existence_before_validation() {
        let mut repo = MockRepository::new();
        repo.expect_get_transaction_by_id().returning(|_| Ok(None));
        repo.expect_patch_transaction().times(0);

        let form = UpdateTransactionForm {
            buyer_name: Some(String::new()),
            quantity: None,
        };

        assert!(matches!(
            update_transaction(&repo, 1, form, PricePolicy::Current),
            Err(ServiceError::NotFound(message)) if message == "Transaction not found"
        ));
    }

    #[test]
    fn update_transaction_rejects_zero_quantity() {
        let mut repo = MockRepository::new();
        repo.expect_get_transaction_by_id()
            .returning(|id| Ok(Some(sale(id, "Alice", product(1, "Widget", 10_000), 3))));
        repo.expect_patch_transaction().times(0);

        let form = UpdateTransactionForm {
            buyer_name: None,
            quantity: Some(0),
        };

        assert!(matches!(
            update_transaction(&repo, 1, form, PricePolicy::Current),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn delete_transaction_reports_not_found() {
        let mut repo = MockTransactionWriter::new();
        repo.expect_delete_transaction()
            .returning(|_| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_transaction(&repo, 77),
            Err(ServiceError::NotFound(message)) if message == "Transaction not found"
        ));
    }
}
