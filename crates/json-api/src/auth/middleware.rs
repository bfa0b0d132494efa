//! Bearer token authentication hoop.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use storefront_app::{auth::AuthServiceError, domain::users::records::Actor};
use tracing::{Span, field::display};

use crate::{errors::ApiError, extensions::*, state::State};

/// Resolve the bearer token to an [`Actor`] and store it in the depot, or
/// stop the chain with a 401.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match authenticate(req, depot).await {
        Ok(actor) => {
            Span::current().record("user_uuid", display(actor.user));

            depot.insert_actor(actor);

            ctrl.call_next(req, depot, res).await;
        }
        Err(rejection) => {
            res.render(rejection);
            ctrl.skip_rest();
        }
    }
}

async fn authenticate(req: &Request, depot: &Depot) -> Result<Actor, ApiError> {
    let token = bearer_token(req).ok_or_else(|| {
        StatusError::unauthorized().brief("Missing or invalid Authorization header")
    })?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|error| match error {
            AuthServiceError::NotFound => {
                StatusError::unauthorized().brief("Invalid API token").into()
            }
            source => ApiError::internal("failed to validate api token", source),
        })
}

fn bearer_token(req: &Request) -> Option<&str> {
    let (scheme, token) = req
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_once(' ')?;

    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::{
        auth::MockAuthService,
        domain::users::records::UserUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[salvo::handler]
    async fn echo_actor(depot: &mut Depot, res: &mut Response) {
        let actor = depot.actor_or_401().ok().map_or_else(
            || "missing".to_string(),
            |actor| format!("{}:{}", actor.user, actor.role),
        );

        res.render(actor);
    }

    fn make_service(auth: MockAuthService) -> Service {
        let mocks = Mocks {
            auth,
            ..Mocks::default()
        };

        Service::new(
            Router::new()
                .hoop(salvo::affix_state::inject(mocks.into_state()))
                .hoop(handler)
                .push(Router::new().get(echo_actor)),
        )
    }

    #[tokio::test]
    async fn missing_authorization_header_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn non_bearer_authorization_header_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn valid_token_injects_actor() -> TestResult {
        let actor = Actor::staff(UserUuid::new());

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(move |_| Ok(actor));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, format!("{}:staff", actor.user));

        Ok(())
    }
}
