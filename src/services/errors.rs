use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures a service call can end with. Each variant maps onto one HTTP
/// status in the routing layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing input.
    #[error("{0}")]
    Validation(String),
    /// The requested record, or a record it references, does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The store rejected the write because of a constraint.
    #[error("{0}")]
    Conflict(String),
    /// The forecasting service failed or returned something unusable.
    #[error("{message}: {details}")]
    Upstream {
        message: String,
        details: String,
        status: Option<u16>,
        raw_output: Option<String>,
    },
    /// The forecasting service did not answer its health probe.
    #[error("forecast service down: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("Record not found".to_string()),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            RepositoryError::Pricing(err) => ServiceError::Validation(err.to_string()),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
