//! `x-request-id` handling.

use std::fmt::{self, Display, Formatter};

use salvo::{
    http::header::HeaderValue,
    prelude::{Depot, Response},
};
use tracing::warn;
use uuid::Uuid;

pub(super) const HEADER: &str = "x-request-id";

const DEPOT_KEY: &str = "request_id";

/// Caller-supplied request id, or a fresh UUIDv7 when none was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestId(String);

impl RequestId {
    pub(super) fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(
                || Self(Uuid::now_v7().to_string()),
                |value| Self(value.to_owned()),
            )
    }

    /// Expose the id to later handlers and echo it back to the caller.
    pub(super) fn attach(&self, depot: &mut Depot, res: &mut Response) {
        depot.insert(DEPOT_KEY, self.0.clone());

        match HeaderValue::from_str(&self.0) {
            Ok(value) => {
                res.headers_mut().insert(HEADER, value);
            }
            Err(source) => warn!(request_id = %self, "request id is not a valid header: {source}"),
        }
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
