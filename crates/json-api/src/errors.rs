//! JSON error bodies for business and validation failures.

use std::fmt::Display;

use salvo::{
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, StatusError},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Always `false`.
    pub success: bool,

    /// Human-readable summary.
    pub message: String,

    /// Per-field or per-item details, when there are any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

/// A single failure within an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorDetail {
    /// Request field the failure refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Cart item the failure refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_uuid: Option<Uuid>,

    /// Variant the failure refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_uuid: Option<Uuid>,

    /// Description of the failure.
    pub message: String,
}

impl ErrorDetail {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            item_uuid: None,
            variant_uuid: None,
            message: message.into(),
        }
    }
}

/// Handler error: either a plain transport-level [`StatusError`] or a JSON
/// [`ErrorBody`] with its status code.
#[derive(Debug)]
pub(crate) enum ApiError {
    Status(StatusError),
    Body { status: StatusCode, body: ErrorBody },
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Body {
            status,
            body: ErrorBody {
                success: false,
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Log `source` and hide it behind a bare 500.
    pub(crate) fn internal(context: &str, source: impl Display) -> Self {
        error!("{context}: {source}");

        Self::Status(StatusError::internal_server_error())
    }

    #[must_use]
    pub(crate) fn with_errors(self, errors: Vec<ErrorDetail>) -> Self {
        match self {
            Self::Body { status, body } => Self::Body {
                status,
                body: ErrorBody { errors, ..body },
            },
            status @ Self::Status(_) => status,
        }
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Self::Status(error) => error.code,
            Self::Body { status, .. } => *status,
        }
    }
}

impl From<StatusError> for ApiError {
    fn from(error: StatusError) -> Self {
        Self::Status(error)
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut salvo::Response) {
        match self {
            Self::Status(error) => res.render(error),
            Self::Body { status, body } => {
                res.status_code(status);
                res.render(Json(body));
            }
        }
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Validation or availability failure"),
            (StatusCode::FORBIDDEN, "Not allowed"),
            (StatusCode::NOT_FOUND, "Not found"),
            (StatusCode::CONFLICT, "Conflicting state"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ErrorBody::to_schema(components)),
            );
        }

        StatusError::register(components, operation);
    }
}
