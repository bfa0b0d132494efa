//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    pricing::final_price,
    products::records::{ProductRecord, VariantRecord},
};

use crate::{errors::ApiError, extensions::*, products::errors::into_api_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    /// Units sold across every variant, net of cancellations
    pub sold_quantity: u64,

    pub variants: Vec<VariantResponse>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            uuid: product.uuid.into(),
            name: product.name,
            sold_quantity: product.sold_quantity,
            variants: product
                .variants
                .into_iter()
                .map(VariantResponse::from)
                .collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub name: String,

    /// Undiscounted unit price
    pub unit_price: u64,

    pub discount_percent: u8,

    /// Unit price after discount
    pub final_price: u64,

    pub is_available: bool,

    pub stock_count: u64,

    pub updated_at: String,
}

impl From<VariantRecord> for VariantResponse {
    fn from(variant: VariantRecord) -> Self {
        Self {
            uuid: variant.uuid.into(),
            product_uuid: variant.product_uuid.into(),
            final_price: final_price(variant.unit_price, variant.discount_percent),
            name: variant.name,
            unit_price: variant.unit_price,
            discount_percent: variant.discount_percent.get(),
            is_available: variant.is_available,
            stock_count: variant.stock_count,
            updated_at: variant.updated_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product with its variants and current prices.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(product.into()))
}
