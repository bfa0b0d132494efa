//! Order Repositories

mod addresses;
mod lines;
mod orders;

pub(crate) use addresses::PgOrderAddressesRepository;
pub(crate) use lines::PgOrderLinesRepository;
pub(crate) use orders::PgOrdersRepository;
