//! My Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::orders::data::OrderFilter;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{
        errors::into_api_error,
        handlers::{index::OrdersPageResponse, page_request, status_filter},
    },
    state::State,
};

/// My Orders Handler
///
/// Lists the caller's own orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersPageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let filter = OrderFilter {
        customer: Some(actor.user),
        status: status_filter(status)?,
    };

    let orders = state
        .app
        .orders
        .list_orders(filter, page_request(page, limit)?)
        .await
        .map_err(into_api_error)?;

    Ok(Json(orders.into()))
}
