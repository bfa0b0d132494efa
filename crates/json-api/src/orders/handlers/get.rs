//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{Order, OrderAddress, OrderLine};

use crate::{errors::ApiError, extensions::*, orders::errors::into_api_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    pub customer_uuid: Uuid,

    /// `pending`, `confirmed`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    pub shipping_cost: u64,

    pub payment_cost: u64,

    /// Discounted line totals plus shipping and payment costs
    pub total_cost: u64,

    pub note: Option<String>,

    pub payment_method: String,

    pub shipping_method: String,

    /// Staff member behind the last status change
    pub updated_by: Option<Uuid>,

    pub address: OrderAddressResponse,

    pub lines: Vec<OrderLineResponse>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order last changed
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into(),
            customer_uuid: order.customer_uuid.into(),
            status: order.status.to_string(),
            shipping_cost: order.shipping_cost,
            payment_cost: order.payment_cost,
            total_cost: order.total_cost,
            note: order.note,
            payment_method: order.payment_method,
            shipping_method: order.shipping_method,
            updated_by: order.updated_by.map(Into::into),
            address: order.address.into(),
            lines: order.lines.into_iter().map(OrderLineResponse::from).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderAddressResponse {
    pub uuid: Uuid,
    pub province: String,
    pub district: String,
    pub ward: String,
    pub detail: String,
    pub user_phone: String,
    pub user_name: String,
}

impl From<OrderAddress> for OrderAddressResponse {
    fn from(address: OrderAddress) -> Self {
        Self {
            uuid: address.uuid.into(),
            province: address.province,
            district: address.district,
            ward: address.ward,
            detail: address.detail,
            user_phone: address.user_phone,
            user_name: address.user_name,
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u64,

    /// Discounted unit price captured when the order was placed
    pub unit_price: u64,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            uuid: line.uuid.into(),
            product_uuid: line.product_uuid.into(),
            variant_uuid: line.variant_uuid.into(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// Get Order Handler
///
/// Customers can only see their own orders; staff can see any order.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
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
        .get_order(actor, order.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService, OrderStatus, OrdersServiceError, records::OrderUuid,
    };

    use crate::test_helpers::{CUSTOMER, Mocks, STAFF, make_order, service_as};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        service_as(
            CUSTOMER,
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_order_returns_lines_and_address() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, CUSTOMER.user, OrderStatus::Pending);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |actor, order| *actor == CUSTOMER && *order == uuid)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "pending");
        assert_eq!(body.address.province, "Ha Noi");
        assert_eq!(body.lines.len(), 1);
        assert_eq!(body.created_at, "1970-01-01T00:00:00Z");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_other_customers_order_returns_403() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_staff_sees_updated_by() -> TestResult {
        let uuid = OrderUuid::new();
        let mut order = make_order(uuid, CUSTOMER.user, OrderStatus::Confirmed);

        order.updated_by = Some(STAFF.user);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(move |_, _| Ok(order));

        let service = service_as(
            STAFF,
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("orders/{order}").get(handler),
        );

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&service)
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.updated_by, Some(STAFF.user.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_404() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
