//! State

use std::sync::Arc;

use storefront_app::context::AppContext;

use crate::config::checkout::CheckoutConfig;

/// Shipping and payment costs added to every order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CheckoutCosts {
    pub(crate) shipping_cost: u64,
    pub(crate) payment_cost: u64,
}

impl From<&CheckoutConfig> for CheckoutCosts {
    fn from(config: &CheckoutConfig) -> Self {
        Self {
            shipping_cost: config.default_shipping_cost,
            payment_cost: config.default_payment_cost,
        }
    }
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) checkout: CheckoutCosts,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, checkout: CheckoutCosts) -> Self {
        Self { app, checkout }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, checkout: CheckoutCosts) -> Arc<Self> {
        Arc::new(Self::new(app, checkout))
    }
}
