use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};
use serde_json::json;

use crate::config::ServerConfig;
use crate::domain::transaction::PatchOutcome;
use crate::forms::transactions::{AddTransactionForm, UpdateTransactionForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::transactions;

#[get("/transactions")]
pub async fn list_transactions(
    params: web::Query<transactions::TransactionsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions::list_transactions(repo.get_ref(), params.into_inner()) {
        Ok(transactions) => HttpResponse::Ok().json(transactions),
        Err(err) => error_response(&err),
    }
}

#[get("/transactions/{transaction_id}")]
pub async fn get_transaction(
    transaction_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions::get_transaction(repo.get_ref(), transaction_id.into_inner()) {
        Ok(transaction) => HttpResponse::Ok().json(transaction),
        Err(err) => error_response(&err),
    }
}

#[post("/transactions")]
pub async fn create_transaction(
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTransactionForm>,
) -> impl Responder {
    match transactions::create_transaction(repo.get_ref(), form.into_inner()) {
        Ok(transaction) => HttpResponse::Created().json(transaction),
        Err(err) => error_response(&err),
    }
}

/// Partial update. The price policy comes from the server configuration.
#[patch("/transactions/{transaction_id}")]
pub async fn update_transaction(
    transaction_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    form: web::Json<UpdateTransactionForm>,
) -> impl Responder {
    match transactions::update_transaction(
        repo.get_ref(),
        transaction_id.into_inner(),
        form.into_inner(),
        server_config.price_policy,
    ) {
        Ok(PatchOutcome::Updated(transaction)) => HttpResponse::Ok().json(transaction),
        Ok(PatchOutcome::Unchanged(transaction)) => HttpResponse::Ok().json(json!({
            "message": "No changes provided",
            "transaction": transaction,
        })),
        Err(err) => error_response(&err),
    }
}

#[delete("/transactions/{transaction_id}")]
pub async fn delete_transaction(
    transaction_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions::delete_transaction(repo.get_ref(), transaction_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Transaction deleted successfully" })),
        Err(err) => error_response(&err),
    }
}
