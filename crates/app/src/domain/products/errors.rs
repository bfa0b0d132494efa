//! Products service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::StorageFault;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        match StorageFault::classify(&error) {
            Some(StorageFault::NotFound) => Self::NotFound,
            Some(StorageFault::Duplicate) => Self::AlreadyExists,
            Some(StorageFault::DanglingReference) => Self::InvalidReference,
            Some(StorageFault::MissingValue) => Self::MissingRequiredData,
            Some(StorageFault::Rejected) => Self::InvalidData,
            None => Self::Sql(error),
        }
    }
}
