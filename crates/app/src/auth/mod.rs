//! Authentication
//!
//! Bearer tokens identify a user; the user's role decides what they may do.

mod errors;
mod records;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use records::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
