//! Update Variant Handler

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

use storefront_app::domain::products::data::VariantUpdate;

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::into_api_error,
        handlers::{discount_percent, get::VariantResponse},
    },
    state::State,
};

/// Update Variant Request
///
/// Every field is replaced.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateVariantRequest {
    pub unit_price: u64,
    pub discount_percent: u8,
    pub is_available: bool,
    pub stock_count: u64,
}

/// Update Variant Handler
///
/// Changes price, discount, availability or stock. Orders already placed
/// keep the price they were placed at. Staff only.
#[endpoint(
    tags("products"),
    summary = "Update Variant",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    variant: PathParam<Uuid>,
    json: JsonBody<UpdateVariantRequest>,
    depot: &mut Depot,
) -> Result<Json<VariantResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.staff_or_403()?;

    let request = json.into_inner();

    let update = VariantUpdate {
        unit_price: request.unit_price,
        discount_percent: discount_percent("discount_percent", request.discount_percent)?,
        is_available: request.is_available,
        stock_count: request.stock_count,
    };

    let variant = state
        .app
        .products
        .update_variant(product.into_inner().into(), variant.into_inner().into(), update)
        .await
        .map_err(into_api_error)?;

    Ok(Json(variant.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        products::{
            MockProductsService, ProductsServiceError,
            records::{ProductUuid, VariantUuid},
        },
        users::records::Actor,
    };

    use crate::test_helpers::{CUSTOMER, Mocks, STAFF, make_variant, service_as};

    use super::*;

    fn make_service(actor: Actor, products: MockProductsService) -> Service {
        service_as(
            actor,
            Mocks {
                products,
                ..Mocks::default()
            },
            Router::with_path("products/{product}/variants/{variant}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_staff_restocks_variant() -> TestResult {
        let product = ProductUuid::new();
        let variant = VariantUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_update_variant()
            .once()
            .withf(move |p, v, update| {
                *p == product && *v == variant && update.stock_count == 40 && !update.is_available
            })
            .return_once(|product, variant, update| {
                let mut record = make_variant(product, variant);

                record.stock_count = update.stock_count;
                record.is_available = update.is_available;

                Ok(record)
            });

        let mut res = TestClient::put(format!(
            "http://example.com/products/{product}/variants/{variant}"
        ))
        .json(&json!({
            "unit_price": 100_000,
            "discount_percent": 0,
            "is_available": false,
            "stock_count": 40,
        }))
        .send(&make_service(STAFF, products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: VariantResponse = res.take_json().await?;

        assert_eq!(body.stock_count, 40);
        assert!(!body.is_available);

        Ok(())
    }

    #[tokio::test]
    async fn test_variant_of_other_product_returns_404() {
        let mut products = MockProductsService::new();

        products
            .expect_update_variant()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!(
            "http://example.com/products/{}/variants/{}",
            ProductUuid::new(),
            VariantUuid::new()
        ))
        .json(&json!({
            "unit_price": 100_000,
            "discount_percent": 0,
            "is_available": true,
            "stock_count": 1,
        }))
        .send(&make_service(STAFF, products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_customers_cannot_update_variants() {
        let mut products = MockProductsService::new();

        products.expect_update_variant().never();

        let res = TestClient::put(format!(
            "http://example.com/products/{}/variants/{}",
            ProductUuid::new(),
            VariantUuid::new()
        ))
        .json(&json!({
            "unit_price": 1,
            "discount_percent": 0,
            "is_available": true,
            "stock_count": 1,
        }))
        .send(&make_service(CUSTOMER, products))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
