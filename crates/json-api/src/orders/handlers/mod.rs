//! Order Handlers

pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod my_orders;
pub(crate) mod status;

use salvo::oapi::extract::QueryParam;
use storefront_app::domain::{
    orders::OrderStatus,
    pagination::{DEFAULT_LIMIT, PageRequest, PageRequestError},
};

use crate::errors::{ApiError, ErrorDetail};

/// Build a page request from optional `page` and `limit` query parameters.
pub(crate) fn page_request(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
) -> Result<PageRequest, ApiError> {
    let page = page.into_inner().unwrap_or(1);
    let limit = limit.into_inner().unwrap_or(DEFAULT_LIMIT);

    PageRequest::new(page, limit).map_err(|error| {
        let field = match error {
            PageRequestError::PageOutOfRange => "page",
            PageRequestError::LimitOutOfRange => "limit",
        };

        ApiError::bad_request("Invalid pagination")
            .with_errors(vec![ErrorDetail::field(field, error.to_string())])
    })
}

/// Parse an optional `status` query parameter.
pub(crate) fn status_filter(
    status: QueryParam<String, false>,
) -> Result<Option<OrderStatus>, ApiError> {
    status
        .into_inner()
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .map_err(|error| {
            ApiError::bad_request("Invalid order status")
                .with_errors(vec![ErrorDetail::field("status", error.to_string())])
        })
}
