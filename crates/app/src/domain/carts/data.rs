//! Cart Data

use crate::domain::{
    carts::records::CartItemUuid,
    products::records::{ProductUuid, VariantUuid},
};

/// New Cart Item Data
///
/// Merged into an existing line for the same product and variant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
}
