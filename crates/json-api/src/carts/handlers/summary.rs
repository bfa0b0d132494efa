//! Cart Summary Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, handlers::get::CartSummaryResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Cart Summary Handler
#[endpoint(
    tags("carts"),
    summary = "Get Cart Summary",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartSummaryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let summary = state
        .app
        .carts
        .summary(actor.user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{carts::records::CartSummary, pricing::PricingError};

    use crate::test_helpers::{CUSTOMER, Mocks, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(CUSTOMER, mocks, Router::with_path("cart/summary").get(handler))
    }

    #[tokio::test]
    async fn test_summary_returns_totals() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.carts.expect_summary().once().return_once(|_| {
            Ok(CartSummary {
                item_count: 2,
                total_quantity: 5,
                total_price: 450_000,
            })
        });

        let mut res = TestClient::get("http://example.com/cart/summary")
            .send(&make_service(mocks))
            .await;

        let body: CartSummaryResponse = res.take_json().await?;

        assert_eq!(body.item_count, 2);
        assert_eq!(body.total_quantity, 5);
        assert_eq!(body.total_price, 450_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_overflow_returns_400() {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_summary()
            .once()
            .return_once(|_| Err(PricingError::Overflow.into()));

        let res = TestClient::get("http://example.com/cart/summary")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
