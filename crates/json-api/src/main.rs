//! Storefront JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use storefront_app::{context::AppContext, database};

use crate::{
    config::ServerConfig,
    observability::{Observability, metrics_handler, request_logging},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod carts;
mod config;
mod errors;
mod extensions;
mod healthcheck;
mod observability;
mod orders;
mod products;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Storefront JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "tracing subscriber failed to install, nothing else can report"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let Some(app) = connect(&config).await else {
        observability.shutdown();

        process::exit(1);
    };

    let addr = config.server.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::shared(app, (&config.checkout).into())))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(router::app_router());

    let doc = OpenApi::new("Storefront API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(source) = shutdown::listen(handle, grace).await {
            error!("failed to install shutdown signal handlers: {source}");
        }
    });

    server.serve(router).await;

    info!("server stopped");

    observability.shutdown();
}

/// Connect to the database, apply migrations when asked, and wire services.
async fn connect(config: &ServerConfig) -> Option<AppContext> {
    let pool = match database::connect(&config.database.database_url).await {
        Ok(pool) => pool,
        Err(source) => {
            error!("failed to connect to database: {source}");

            return None;
        }
    };

    if config.database.run_migrations {
        if let Err(source) = database::migrate(&pool).await {
            error!("failed to apply migrations: {source}");

            return None;
        }

        info!("migrations applied");
    }

    Some(AppContext::from_pool(pool, config.checkout.retry_policy()))
}
