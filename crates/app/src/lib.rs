//! Storefront domain services and persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod retry;

#[cfg(test)]
mod test;

mod uuids;
