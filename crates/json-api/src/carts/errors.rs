//! Errors

use storefront_app::domain::carts::CartsServiceError;

use crate::errors::{ApiError, ErrorDetail};

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::InvalidQuantity => ApiError::bad_request("Invalid quantity")
            .with_errors(vec![ErrorDetail::field("quantity", error.to_string())]),
        CartsServiceError::Unavailable(availability) => {
            ApiError::bad_request(availability.to_string())
        }
        CartsServiceError::NotFound => ApiError::not_found("Cart item or variant not found"),
        CartsServiceError::AlreadyExists => ApiError::conflict("Cart item already exists"),
        CartsServiceError::InvalidReference => ApiError::not_found("Product or variant not found"),
        CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData
        | CartsServiceError::Pricing(_) => ApiError::bad_request("Invalid cart payload"),
        CartsServiceError::Sql(source) => ApiError::internal("cart storage failed", source),
    }
}
