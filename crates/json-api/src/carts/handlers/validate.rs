//! Validate Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::records::{CartItemValidation, CartValidation},
    inventory::Availability,
};

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Cart Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartValidationResponse {
    /// Whether every line can be purchased right now
    pub valid: bool,

    pub validation_results: Vec<CartItemValidationResponse>,
}

impl From<CartValidation> for CartValidationResponse {
    fn from(validation: CartValidation) -> Self {
        Self {
            valid: validation.valid,
            validation_results: validation
                .results
                .into_iter()
                .map(CartItemValidationResponse::from)
                .collect(),
        }
    }
}

/// Cart Item Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemValidationResponse {
    pub item_uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u64,
    pub available: bool,

    /// `available`, `variant_not_found`, `unavailable` or `insufficient_stock`
    pub status: String,

    /// Human-readable outcome
    pub message: String,

    /// Units left, when stock is the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<u64>,
}

impl From<CartItemValidation> for CartItemValidationResponse {
    fn from(result: CartItemValidation) -> Self {
        let remaining_stock = match result.availability {
            Availability::InsufficientStock { remaining } => Some(remaining),
            _ => None,
        };

        Self {
            item_uuid: result.item.into(),
            product_uuid: result.product_uuid.into(),
            variant_uuid: result.variant_uuid.into(),
            quantity: result.quantity,
            available: result.availability.is_available(),
            status: result.availability.kind().to_string(),
            message: result.availability.to_string(),
            remaining_stock,
        }
    }
}

/// Validate Cart Handler
///
/// Checks every line against current stock. Nothing is reserved.
#[endpoint(
    tags("carts"),
    summary = "Validate Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartValidationResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let validation = state
        .app
        .carts
        .validate(actor.user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(validation.into()))
}
