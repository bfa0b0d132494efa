//! Orders
//!
//! Checkout turns a cart into an order while reserving stock, and every
//! later status change follows a fixed transition graph.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
pub use status::OrderStatus;
