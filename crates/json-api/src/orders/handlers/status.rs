//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::OrderStatus;

use crate::{
    errors::{ApiError, ErrorDetail},
    extensions::*,
    observability::record_order_cancelled,
    orders::{errors::into_api_error, handlers::get::OrderResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// Target status
    pub status: String,
}

/// Update Order Status Handler
///
/// Moves an order one step along its lifecycle. Staff only.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.staff_or_403()?;

    let status = json.into_inner().status.parse::<OrderStatus>().map_err(|error| {
        ApiError::bad_request("Invalid order status")
            .with_errors(vec![ErrorDetail::field("status", error.to_string())])
    })?;

    let order = state
        .app
        .orders
        .update_status(actor, order.into_inner().into(), status)
        .await
        .map_err(into_api_error)?;

    if status == OrderStatus::Cancelled {
        record_order_cancelled();
    }

    Ok(Json(order.into()))
}
