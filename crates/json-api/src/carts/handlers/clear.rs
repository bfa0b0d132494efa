//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::debug;

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Clear Cart Handler
#[endpoint(
    tags("carts"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart cleared"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    )
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let removed = state
        .app
        .carts
        .clear(actor.user)
        .await
        .map_err(into_api_error)?;

    debug!(removed, "cleared cart");

    Ok(StatusCode::NO_CONTENT)
}
