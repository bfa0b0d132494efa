//! Users service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::StorageFault;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match StorageFault::classify(&error) {
            Some(StorageFault::NotFound) => Self::NotFound,
            Some(StorageFault::Duplicate) => Self::AlreadyExists,
            Some(StorageFault::MissingValue | StorageFault::Rejected) => Self::InvalidData,
            Some(StorageFault::DanglingReference) | None => Self::Sql(error),
        }
    }
}
