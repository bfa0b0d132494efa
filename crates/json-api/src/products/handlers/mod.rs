//! Product Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod update_variant;

use storefront_app::domain::pricing::DiscountPercent;

use crate::errors::{ApiError, ErrorDetail};

pub(crate) fn discount_percent(field: &str, percent: u8) -> Result<DiscountPercent, ApiError> {
    DiscountPercent::new(percent).map_err(|error| {
        ApiError::bad_request("Invalid product payload")
            .with_errors(vec![ErrorDetail::field(field, error.to_string())])
    })
}
