//! Products Data

use crate::domain::{
    pricing::DiscountPercent,
    products::records::{ProductUuid, VariantUuid},
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub variants: Vec<NewVariant>,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub name: String,
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub is_available: bool,
    pub stock_count: u64,
}

/// Variant Update Data
///
/// Replaces every mutable field of the variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantUpdate {
    pub unit_price: u64,
    pub discount_percent: DiscountPercent,
    pub is_available: bool,
    pub stock_count: u64,
}
