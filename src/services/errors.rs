use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer to the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,
    /// The submitted form data was rejected.
    #[error("{0}")]
    Form(String),
    /// A subtraction asked for more units than are on stock.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },
    /// The data store failed or was unreachable.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}
