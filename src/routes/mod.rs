use actix_multipart::form::MultipartFormConfig;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, error, get, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::services::ServiceError;

pub mod forecast;
pub mod products;
pub mod transactions;

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_output: Option<&'a str>,
}

impl<'a> ErrorEnvelope<'a> {
    fn new(error: &'a str) -> Self {
        Self {
            error,
            details: None,
            status: None,
            raw_output: None,
        }
    }

    fn details(mut self, details: &'a str) -> Self {
        self.details = Some(details);
        self
    }
}

/// HTTP status a service error is reported with.
pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render `err` as the JSON error envelope and log it.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let status = status_for(err);
    if status.is_server_error() {
        log::error!("{err}");
    } else {
        log::warn!("{err}");
    }

    let envelope = match err {
        ServiceError::Validation(message) | ServiceError::NotFound(message) => {
            ErrorEnvelope::new(message)
        }
        ServiceError::Conflict(details) => ErrorEnvelope::new("Constraint violation").details(details),
        ServiceError::Upstream {
            message,
            details,
            status,
            raw_output,
        } => ErrorEnvelope {
            error: message,
            details: Some(details),
            status: *status,
            raw_output: raw_output.as_deref(),
        },
        ServiceError::Unavailable(details) => {
            ErrorEnvelope::new("Forecast service down").details(details)
        }
        ServiceError::Internal(details) => {
            ErrorEnvelope::new("Internal server error").details(details)
        }
    };

    HttpResponse::build(status).json(envelope)
}

/// Wrap an extractor failure so it reaches the client as a 400 envelope.
fn bad_request<E>(err: E, message: &str) -> error::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let response = error_response(&ServiceError::validation(format!("{message}: {err}")));
    error::InternalError::from_response(err, response).into()
}

#[derive(Debug, Serialize)]
struct Pong {
    message: &'static str,
    timestamp: String,
}

#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(Pong {
        message: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Register `/ping` and every `/api/v1` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ping).service(
        web::scope("/api/v1")
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| bad_request(err, "Invalid JSON body")),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _req| bad_request(err, "Invalid path parameter")),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| bad_request(err, "Invalid query string")),
            )
            .app_data(
                MultipartFormConfig::default()
                    .error_handler(|err, _req| bad_request(err, "Invalid multipart payload")),
            )
            .service(products::list_products)
            .service(products::create_product)
            .service(products::get_product)
            .service(products::update_product)
            .service(products::delete_product)
            .service(transactions::list_transactions)
            .service(transactions::create_transaction)
            .service(transactions::get_transaction)
            .service(transactions::update_transaction)
            .service(transactions::delete_transaction)
            .service(forecast::upload_forecast)
            .service(forecast::forecast_health),
    );
}
