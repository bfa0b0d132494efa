//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::{
    data::{NewOrder, NewOrderAddress},
    records::{OrderAddressUuid, OrderUuid},
};

use crate::{
    errors::{ApiError, ErrorDetail},
    extensions::*,
    observability::record_order_created,
    orders::{errors::into_api_error, handlers::get::OrderResponse},
    state::{CheckoutCosts, State},
};

/// Order Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderAddressRequest {
    pub province: String,
    pub district: String,
    pub ward: String,
    pub detail: String,
    pub user_phone: String,
    pub user_name: String,
}

/// Create Order Request
///
/// Lines are taken from the caller's cart. Shipping and payment costs are
/// set by the server and cannot be supplied here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub order_address: OrderAddressRequest,

    #[serde(default)]
    pub order_note: Option<String>,

    pub payment_method: String,

    pub shipping_method: String,
}

impl CreateOrderRequest {
    fn blank_fields(&self) -> Vec<ErrorDetail> {
        let address = &self.order_address;

        [
            ("order_address.province", &address.province),
            ("order_address.district", &address.district),
            ("order_address.ward", &address.ward),
            ("order_address.detail", &address.detail),
            ("order_address.user_phone", &address.user_phone),
            ("order_address.user_name", &address.user_name),
            ("payment_method", &self.payment_method),
            ("shipping_method", &self.shipping_method),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| ErrorDetail::field(field, "must not be empty"))
        .collect()
    }

    fn into_new_order(self, costs: CheckoutCosts) -> NewOrder {
        let address = self.order_address;

        NewOrder {
            uuid: OrderUuid::new(),
            address: NewOrderAddress {
                uuid: OrderAddressUuid::new(),
                province: address.province,
                district: address.district,
                ward: address.ward,
                detail: address.detail,
                user_phone: address.user_phone,
                user_name: address.user_name,
            },
            shipping_cost: costs.shipping_cost,
            payment_cost: costs.payment_cost,
            note: self.order_note.filter(|note| !note.trim().is_empty()),
            payment_method: self.payment_method,
            shipping_method: self.shipping_method,
        }
    }
}

/// Create Order Handler
///
/// Places an order for everything in the caller's cart, reserving stock and
/// clearing the cart. Nothing changes if any line cannot be fulfilled.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let request = json.into_inner();
    let blank = request.blank_fields();

    if !blank.is_empty() {
        return Err(ApiError::bad_request("Invalid order payload").with_errors(blank));
    }

    let order = state
        .app
        .orders
        .create_order(actor.user, request.into_new_order(state.checkout))
        .await
        .map_err(into_api_error)?;

    record_order_created();

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
