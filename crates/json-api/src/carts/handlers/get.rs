//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::records::{Cart, CartItem, CartLine, CartSummary};

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Owner of the cart
    pub user_uuid: Uuid,

    /// Lines in the cart, oldest first
    pub lines: Vec<CartLineResponse>,

    /// Totals over every line
    pub summary: CartSummaryResponse,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            user_uuid: cart.user_uuid.into(),
            lines: cart.lines.into_iter().map(CartLineResponse::from).collect(),
            summary: cart.summary.into(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The stored cart item
    pub item: CartItemResponse,

    /// Variant name, when the variant still exists
    pub variant_name: Option<String>,

    /// Undiscounted unit price
    pub unit_price: Option<u64>,

    /// Discount applied to the unit price
    pub discount_percent: Option<u8>,

    /// Unit price after discount
    pub final_price: Option<u64>,

    /// Whether the quantity can currently be bought
    pub available: bool,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let final_price = line.final_price();
        let available = line.availability().is_available();

        Self {
            variant_name: line.variant.as_ref().map(|v| v.name.clone()),
            unit_price: line.variant.as_ref().map(|v| v.unit_price),
            discount_percent: line.variant.as_ref().map(|v| v.discount_percent.get()),
            final_price,
            available,
            item: line.item.into(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub variant_uuid: Uuid,

    pub quantity: u64,

    /// The date and time the item was added
    pub created_at: String,

    /// The date and time the item was last updated
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            variant_uuid: item.variant_uuid.into(),
            quantity: item.quantity,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Cart Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartSummaryResponse {
    /// Number of distinct lines
    pub item_count: u64,

    /// Sum of line quantities
    pub total_quantity: u64,

    /// Sum of discounted line totals
    pub total_price: u64,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            item_count: summary.item_count,
            total_quantity: summary.total_quantity,
            total_price: summary.total_price,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating nothing when it is empty.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(actor.user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
