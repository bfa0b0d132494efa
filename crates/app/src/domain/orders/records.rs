//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{
        orders::status::OrderStatus,
        products::records::{ProductUuid, VariantUuid},
        users::records::UserUuid,
    },
    uuids::{Entity, TypedUuid},
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Address UUID
pub type OrderAddressUuid = TypedUuid<OrderAddress>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

/// Delivery address captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAddress {
    pub uuid: OrderAddressUuid,
    pub province: String,
    pub district: String,
    pub ward: String,
    pub detail: String,
    pub user_phone: String,
    pub user_name: String,
    pub created_at: Timestamp,
}

/// A purchased variant and the unit price paid for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,

    /// Discounted unit price at the time of purchase.
    pub unit_price: u64,
}

/// Order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_uuid: UserUuid,
    pub status: OrderStatus,
    pub shipping_cost: u64,
    pub payment_cost: u64,

    /// Sum of all line totals plus shipping and payment costs.
    pub total_cost: u64,

    pub note: Option<String>,
    pub payment_method: String,
    pub shipping_method: String,

    /// Staff user behind the most recent status change.
    pub updated_by: Option<UserUuid>,

    pub address: OrderAddress,
    pub lines: Vec<OrderLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Order {
    const LABEL: &'static str = "order";
}

impl Entity for OrderAddress {
    const LABEL: &'static str = "order_address";
}

impl Entity for OrderLine {
    const LABEL: &'static str = "order_line";
}
