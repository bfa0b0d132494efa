//! Auth Records

use jiff::Timestamp;

use crate::{
    auth::ApiTokenVersion,
    domain::users::records::{UserRole, UserUuid},
};

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenRecord {
    pub uuid: uuid::Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// Token data needed to verify a bearer token.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub user_uuid: UserUuid,
    pub role: UserRole,
    pub token_hash: String,
}

/// A freshly issued token. The raw token is only available here.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub record: ApiTokenRecord,
}
