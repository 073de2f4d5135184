pub use errors::{ServiceError, ServiceResult};

pub mod errors;
pub mod forecast;
pub mod products;
pub mod transactions;

/// Trimmed query parameter, `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Replace the generic not-found message with one naming the entity.
pub(crate) fn not_found_as(err: ServiceError, message: &str) -> ServiceError {
    match err {
        ServiceError::NotFound(_) => ServiceError::not_found(message),
        other => other,
    }
}
