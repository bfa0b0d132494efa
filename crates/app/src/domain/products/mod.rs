//! Products
//!
//! The slice of the catalog the checkout core depends on: products with a
//! running sold-quantity counter, and their purchasable variants.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
