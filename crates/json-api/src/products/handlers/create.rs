//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::data::{NewProduct, NewVariant};

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::into_api_error,
        handlers::{discount_percent, get::ProductResponse},
    },
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub uuid: Uuid,
    pub name: String,
    pub variants: Vec<CreateVariantRequest>,
}

/// Create Variant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateVariantRequest {
    pub uuid: Uuid,
    pub name: String,
    pub unit_price: u64,

    /// Percentage off the unit price, `0..=100`
    #[serde(default)]
    pub discount_percent: u8,

    #[serde(default = "available_by_default")]
    pub is_available: bool,

    #[serde(default)]
    pub stock_count: u64,
}

const fn available_by_default() -> bool {
    true
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        let variants = self
            .variants
            .into_iter()
            .enumerate()
            .map(|(index, variant)| {
                Ok(NewVariant {
                    uuid: variant.uuid.into(),
                    discount_percent: discount_percent(
                        &format!("variants.{index}.discount_percent"),
                        variant.discount_percent,
                    )?,
                    name: variant.name,
                    unit_price: variant.unit_price,
                    is_available: variant.is_available,
                    stock_count: variant.stock_count,
                })
            })
            .collect::<Result<_, ApiError>>()?;

        Ok(NewProduct {
            uuid: self.uuid.into(),
            name: self.name,
            variants,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.staff_or_403()?;

    let product = state
        .app
        .products
        .create_product(json.into_inner().into_new_product()?)
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        products::{
            MockProductsService, ProductsServiceError,
            records::{ProductRecord, VariantRecord},
        },
        users::records::Actor,
    };

    use crate::{
        errors::ErrorBody,
        test_helpers::{CUSTOMER, Mocks, STAFF, service_as},
    };

    use super::*;

    fn make_service(actor: Actor, products: MockProductsService) -> Service {
        service_as(
            actor,
            Mocks {
                products,
                ..Mocks::default()
            },
            Router::with_path("products").post(handler),
        )
    }

    fn record(product: NewProduct) -> ProductRecord {
        ProductRecord {
            uuid: product.uuid,
            name: product.name,
            sold_quantity: 0,
            variants: product
                .variants
                .into_iter()
                .map(|variant| VariantRecord {
                    uuid: variant.uuid,
                    product_uuid: product.uuid,
                    name: variant.name,
                    unit_price: variant.unit_price,
                    discount_percent: variant.discount_percent,
                    is_available: variant.is_available,
                    stock_count: variant.stock_count,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
                .collect(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_staff_creates_product_with_variants() -> TestResult {
        let uuid = Uuid::now_v7();
        let variant = Uuid::now_v7();

        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(move |product| {
                product.uuid.into_uuid() == uuid
                    && product.variants.len() == 1
                    && product.variants.iter().all(|v| v.is_available && v.stock_count == 7)
            })
            .return_once(|product| Ok(record(product)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "uuid": uuid,
                "name": "Linen Shirt",
                "variants": [{
                    "uuid": variant,
                    "name": "M / Blue",
                    "unit_price": 250_000,
                    "discount_percent": 20,
                    "stock_count": 7,
                }],
            }))
            .send(&make_service(STAFF, products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(location, Some(format!("/products/{uuid}")));
        assert_eq!(
            body.variants.first().map(|v| v.final_price),
            Some(200_000)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_discount_above_100_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "uuid": Uuid::now_v7(),
                "name": "Linen Shirt",
                "variants": [{
                    "uuid": Uuid::now_v7(),
                    "name": "M / Blue",
                    "unit_price": 250_000,
                    "discount_percent": 120,
                }],
            }))
            .send(&make_service(STAFF, products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(
            body.errors.first().and_then(|e| e.field.as_deref()),
            Some("variants.0.discount_percent")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_cannot_create_products() {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "uuid": Uuid::now_v7(), "name": "Shirt", "variants": [] }))
            .send(&make_service(CUSTOMER, products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_duplicate_product_returns_409() {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "uuid": Uuid::now_v7(), "name": "Shirt", "variants": [] }))
            .send(&make_service(STAFF, products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
