//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    errors::ApiError,
    extensions::*,
    observability::record_order_cancelled,
    orders::{errors::into_api_error, handlers::get::OrderResponse},
    state::State,
};

/// Cancel Order Handler
///
/// Cancels a pending, confirmed or processing order and returns its stock.
/// Cancelling an already-cancelled order succeeds without changing it.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let order = state
        .app
        .orders
        .cancel_order(actor, order.into_inner().into())
        .await
        .map_err(into_api_error)?;

    record_order_cancelled();

    Ok(Json(order.into()))
}
