//! Storefront Domain Concerns

pub(crate) mod amounts;
pub mod carts;
pub mod inventory;
pub mod orders;
pub mod pagination;
pub mod pricing;
pub mod products;
pub(crate) mod storage;
pub mod users;
