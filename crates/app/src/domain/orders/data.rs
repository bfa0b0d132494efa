//! Order Data

use crate::domain::{
    orders::{
        records::{OrderAddressUuid, OrderLineUuid, OrderUuid},
        status::OrderStatus,
    },
    products::records::{ProductUuid, VariantUuid},
    users::records::UserUuid,
};

/// New Order Data
///
/// Lines come from the customer's cart, not from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub address: NewOrderAddress,
    pub shipping_cost: u64,
    pub payment_cost: u64,
    pub note: Option<String>,
    pub payment_method: String,
    pub shipping_method: String,
}

/// New Order Address Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderAddress {
    pub uuid: OrderAddressUuid,
    pub province: String,
    pub district: String,
    pub ward: String,
    pub detail: String,
    pub user_phone: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NewOrderLine {
    pub uuid: OrderLineUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub unit_price: u64,
}

/// Criteria for listing orders. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer: Option<UserUuid>,
    pub status: Option<OrderStatus>,
}
