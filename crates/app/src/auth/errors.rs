//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The token is malformed, unknown, revoked, or does not verify.
    #[error("token not found")]
    NotFound,

    #[error("user not found")]
    UnknownUser,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        let foreign_key_violation = error
            .as_database_error()
            .is_some_and(|database_error| database_error.is_foreign_key_violation());

        if foreign_key_violation {
            return Self::UnknownUser;
        }

        Self::Sql(error)
    }
}
