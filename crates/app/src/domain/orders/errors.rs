//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    database,
    domain::{
        carts::records::CartItemValidation, orders::status::OrderStatus, pricing::PricingError,
        products::records::VariantUuid, storage::StorageFault,
    },
    retry::Transient,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("{} cart item(s) cannot be fulfilled", .0.len())]
    Unavailable(Vec<CartItemValidation>),

    #[error("variant {variant} sold out during checkout")]
    OutOfStock { variant: VariantUuid },

    #[error("order not found")]
    NotFound,

    #[error("not allowed to act on this order")]
    Forbidden,

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order already exists")]
    AlreadyExists,

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

impl From<Error> for OrdersServiceError {
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

impl Transient for OrdersServiceError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Sql(error) => database::is_transient(error),
            _ => false,
        }
    }
}
