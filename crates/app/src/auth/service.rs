//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::{
    auth::{ApiToken, ApiTokenRecord, AuthServiceError, IssuedApiToken, repository::PgAuthRepository},
    domain::users::records::{Actor, UserUuid},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UnknownUser`] if the user does not exist,
    /// or an error if the insert fails.
    pub async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let token = ApiToken::generate();

        let record = self
            .repository
            .create_api_token(token.uuid(), user, token.version(), &token.digest(user))
            .await?;

        info!(token_uuid = %record.uuid, user_uuid = %user, "issued api token");

        Ok(IssuedApiToken {
            token: token.to_string(),
            record,
        })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenRecord>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_user(user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: uuid::Uuid) -> Result<bool, AuthServiceError> {
        let revoked = self.repository.revoke_api_token(token_uuid).await?;

        if revoked.is_some() {
            info!(%token_uuid, "revoked api token");
        }

        Ok(revoked.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError> {
        let token: ApiToken = bearer_token
            .parse()
            .map_err(|_invalid| AuthServiceError::NotFound)?;

        let stored = self
            .repository
            .find_active_api_token(token.uuid(), token.version())
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !token.matches(stored.user_uuid, &stored.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort; a failed touch does not fail authentication.
        let _touched = self
            .repository
            .touch_api_token_last_used(token.uuid())
            .await;

        Ok(Actor {
            user: stored.user_uuid,
            role: stored.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user and role it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::users::records::UserRole, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_its_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let issued = service.issue_api_token(ctx.staff.user).await?;
        let actor = service.authenticate_bearer(&issued.token).await?;

        assert_eq!(actor.user, ctx.staff.user);
        assert_eq!(actor.role, UserRole::Staff);

        let tokens = service.list_api_tokens(ctx.staff.user).await?;

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].last_used_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let issued = service.issue_api_token(ctx.customer.user).await?;

        assert!(service.revoke_api_token(issued.record.uuid).await?);
        assert!(!service.revoke_api_token(issued.record.uuid).await?);

        let result = service.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let issued = service.issue_api_token(ctx.customer.user).await?;
        let (identifier, _secret) = issued
            .token
            .split_once('.')
            .ok_or("issued token has no secret")?;
        let tampered = format!("{identifier}.{}", "0".repeat(64));

        let result = service.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let result = service.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_fails() {
        let ctx = TestContext::new().await;
        let service = PgAuthService::new(ctx.db.pool().clone());

        let result = service.issue_api_token(UserUuid::new()).await;

        assert!(
            matches!(result, Err(AuthServiceError::UnknownUser)),
            "expected UnknownUser, got {result:?}"
        );
    }
}
