//! Errors

use storefront_app::domain::orders::OrdersServiceError;

use crate::{
    errors::{ApiError, ErrorDetail},
    observability::{CheckoutRejection, record_checkout_rejection},
};

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::EmptyCart => {
            record_checkout_rejection(CheckoutRejection::EmptyCart);

            ApiError::bad_request("Cart is empty")
        }
        OrdersServiceError::Unavailable(failures) => {
            record_checkout_rejection(CheckoutRejection::Unavailable);

            let errors = failures
                .into_iter()
                .map(|failure| ErrorDetail {
                    field: None,
                    item_uuid: Some(failure.item.into()),
                    variant_uuid: Some(failure.variant_uuid.into()),
                    message: failure.availability.to_string(),
                })
                .collect();

            ApiError::bad_request("Some cart items cannot be ordered").with_errors(errors)
        }
        OrdersServiceError::OutOfStock { variant } => {
            record_checkout_rejection(CheckoutRejection::OutOfStock);

            ApiError::bad_request("A variant sold out during checkout").with_errors(vec![
                ErrorDetail {
                    field: None,
                    item_uuid: None,
                    variant_uuid: Some(variant.into()),
                    message: "out of stock".to_string(),
                },
            ])
        }
        OrdersServiceError::NotFound => ApiError::not_found("Order not found"),
        OrdersServiceError::Forbidden => ApiError::forbidden("Not allowed to act on this order"),
        error @ OrdersServiceError::InvalidTransition { .. } => {
            ApiError::conflict(capitalise(&error.to_string()))
        }
        OrdersServiceError::AlreadyExists => ApiError::conflict("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData
        | OrdersServiceError::Pricing(_) => ApiError::bad_request("Invalid order payload"),
        OrdersServiceError::Sql(source) => ApiError::internal("order storage failed", source),
    }
}

fn capitalise(message: &str) -> String {
    let mut chars = message.chars();

    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
