//! Product Records

use jiff::Timestamp;

use crate::{
    domain::pricing::DiscountPercent,
    uuids::{Entity, TypedUuid},
};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,

    /// Units sold across all non-cancelled orders.
    pub sold_quantity: u64,

    pub variants: Vec<VariantRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Variant Record
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,

    /// List price in minor units, before discount.
    pub unit_price: u64,

    pub discount_percent: DiscountPercent,
    pub is_available: bool,
    pub stock_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for ProductRecord {
    const LABEL: &'static str = "product";
}

impl Entity for VariantRecord {
    const LABEL: &'static str = "variant";
}
