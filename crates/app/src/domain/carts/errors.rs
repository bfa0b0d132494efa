//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::{inventory::Availability, pricing::PricingError, storage::StorageFault};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item already exists")]
    AlreadyExists,

    #[error("cart item not found")]
    NotFound,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("requested quantity cannot be fulfilled: {0}")]
    Unavailable(Availability),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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
