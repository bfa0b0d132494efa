//! App Router

use salvo::Router;

use crate::{
    auth,
    carts::handlers as carts,
    orders::handlers as orders,
    products::handlers as products,
};

/// Every route behind bearer authentication.
///
/// Literal segments are registered before the `{item}` and `{order}`
/// captures they would otherwise collide with.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("validate").get(carts::validate::handler))
                .push(Router::with_path("summary").get(carts::summary::handler))
                .push(
                    Router::with_path("{item}")
                        .put(carts::update::handler)
                        .delete(carts::remove::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("my-orders").get(orders::my_orders::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").put(orders::cancel::handler))
                        .push(Router::with_path("status").put(orders::status::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .push(
                            Router::with_path("variants/{variant}")
                                .put(products::update_variant::handler),
                        ),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use storefront_app::{
        auth::AuthServiceError,
        domain::{carts::records::CartSummary, orders::data::OrderFilter, pagination::Page},
    };

    use crate::{
        carts::handlers::get::CartSummaryResponse,
        orders::handlers::index::OrdersPageResponse,
        test_helpers::{CUSTOMER, Mocks},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    fn authenticated() -> Mocks {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .returning(|_| Ok(CUSTOMER));

        mocks
    }

    #[tokio::test]
    async fn test_requests_without_token_are_rejected() {
        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com/cart")
            .add_header(AUTHORIZATION, "Bearer sf_v1_nope", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_cart_summary_is_not_captured_as_an_item() -> TestResult {
        let mut mocks = authenticated();

        mocks
            .carts
            .expect_summary()
            .once()
            .return_once(|_| Ok(CartSummary::default()));

        let mut res = TestClient::get("http://example.com/cart/summary")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartSummaryResponse = res.take_json().await?;

        assert_eq!(body.item_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_my_orders_is_not_captured_as_an_order() -> TestResult {
        let mut mocks = authenticated();

        mocks
            .orders
            .expect_list_orders()
            .once()
            .withf(|filter, _| {
                *filter
                    == OrderFilter {
                        customer: Some(CUSTOMER.user),
                        status: None,
                    }
            })
            .return_once(|_, page| Ok(Page::new(Vec::new(), 0, page)));

        mocks.orders.expect_get_order().never();

        let mut res = TestClient::get("http://example.com/orders/my-orders")
            .add_header(AUTHORIZATION, "Bearer token", true)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrdersPageResponse = res.take_json().await?;

        assert_eq!(body.total, 0);

        Ok(())
    }
}
