//! Checkout Config

use clap::Args;
use storefront_app::retry::RetryPolicy;

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Attempts for an order creation that hits a serialization failure or deadlock
    #[arg(
        long,
        env = "CHECKOUT_RETRY_ATTEMPTS",
        default_value_t = 3_u32,
        value_parser = clap::value_parser!(u32).range(1..=10)
    )]
    pub checkout_retry_attempts: u32,

    /// Shipping cost added to every order
    #[arg(long, env = "DEFAULT_SHIPPING_COST", default_value_t = 0_u64)]
    pub default_shipping_cost: u64,

    /// Payment cost added to every order
    #[arg(long, env = "DEFAULT_PAYMENT_COST", default_value_t = 0_u64)]
    pub default_payment_cost: u64,
}

impl CheckoutConfig {
    /// Retry policy for order creation.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.checkout_retry_attempts)
    }
}
