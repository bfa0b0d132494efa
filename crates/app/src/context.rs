//! App Context

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::{AuthService, PgAuthService},
    database::Db,
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
    retry::RetryPolicy,
};

/// Every service an outer surface needs, behind trait objects.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context over an existing connection pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, checkout_retry: RetryPolicy) -> Self {
        let db = Db::new(pool.clone());

        Self {
            users: Arc::new(PgUsersService::new(pool.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db, checkout_retry)),
            auth: Arc::new(PgAuthService::new(pool)),
        }
    }
}
