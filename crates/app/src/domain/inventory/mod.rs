//! Inventory
//!
//! Stock movements on product variants. Every operation runs inside the
//! caller's transaction so it commits or rolls back together with the order
//! rows it accompanies.

mod availability;
pub(crate) mod repository;

pub use availability::{Availability, check_availability};
