//! Typed depot lookups.

use std::any::{Any, type_name};

use salvo::prelude::Depot;

use crate::errors::ApiError;

pub(crate) trait DepotExt {
    /// Fetch a value an earlier hoop injected; its absence is a wiring bug, so 500.
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_missing| ApiError::internal("depot value missing", type_name::<T>()))
    }
}
