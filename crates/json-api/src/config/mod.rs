//! Server configuration module

use clap::Parser;

use crate::config::{
    checkout::CheckoutConfig,
    db::DatabaseConfig,
    server::ServerRuntimeConfig,
    telemetry::{LoggingConfig, TelemetryConfig},
};

pub(crate) mod checkout;
pub(crate) mod db;
pub(crate) mod server;
pub(crate) mod telemetry;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Listener settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Log output.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Trace export.
    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Checkout behaviour.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    /// Read `.env` when present, then parse flags and environment.
    ///
    /// # Errors
    ///
    /// Returns the clap error for a missing or malformed setting.
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_flags() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--database-url",
            "postgres://localhost/storefront",
        ])?;

        assert_eq!(config.checkout.checkout_retry_attempts, 3);
        assert_eq!(config.checkout.default_shipping_cost, 0);
        assert_eq!(config.server.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.server.shutdown_grace().as_secs(), 10);
        assert!(!config.telemetry.enabled, "trace export is opt-in");
        assert!(!config.database.run_migrations, "migrations are opt-in");

        Ok(())
    }
}
