//! List Orders Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    orders::{data::OrderFilter, records::Order},
    pagination::Page,
};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{
        errors::into_api_error,
        handlers::{get::OrderResponse, page_request, status_filter},
    },
    state::State,
};

/// Orders Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersPageResponse {
    /// Orders on this page, newest first
    pub orders: Vec<OrderResponse>,

    /// Orders matching the filter across all pages
    pub total: u64,

    pub page: u32,

    pub limit: u32,

    pub total_pages: u64,
}

impl From<Page<Order>> for OrdersPageResponse {
    fn from(page: Page<Order>) -> Self {
        let total_pages = page.total_pages();

        Self {
            orders: page.items.into_iter().map(OrderResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}

/// List Orders Handler
///
/// Lists every customer's orders. Staff only.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    status: QueryParam<String, false>,
    customer: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersPageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.staff_or_403()?;

    let filter = OrderFilter {
        customer: customer.into_inner().map(Into::into),
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
