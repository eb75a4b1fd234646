//! Bearer-token access guard.
//!
//! [`AuthenticatedUser`] is the only way handlers obtain a caller identity:
//! it extracts the `Authorization: Bearer` header, verifies the token
//! through the auth service, and loads the stored user (password hash
//! excluded). Missing or invalid credentials fail closed with 401 before
//! any handler code runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

use super::state::HttpState;

/// The caller identity attached to a request by the access guard.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// Borrow the authenticated user.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the guard, yielding the authenticated user.
    pub fn into_user(self) -> User {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthorized("no token"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("no token"))?;
    if token.is_empty() {
        return Err(Error::unauthorized("no token"));
    }
    Ok(token.to_owned())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state missing from request"))?;
            let user = state.auth.resolve_bearer(&token?).await?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{seeded_state, test_app};

    #[actix_web::test]
    async fn missing_header_is_rejected_with_no_token() {
        let app = test::init_service(test_app(seeded_state().await.state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/users/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "no token");
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_rejected_with_no_token() {
        let app = test::init_service(test_app(seeded_state().await.state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header((AUTHORIZATION, "Basic abc123"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "no token");
    }

    #[actix_web::test]
    async fn garbage_token_is_rejected_with_not_authorized() {
        let app = test::init_service(test_app(seeded_state().await.state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header((AUTHORIZATION, "Bearer garbage"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "not authorized");
    }

    #[actix_web::test]
    async fn valid_token_attaches_the_stored_user() {
        let seeded = seeded_state().await;
        let app = test::init_service(App::new().app_data(web::Data::new(seeded.state)).route(
            "/whoami",
            web::get().to(|caller: AuthenticatedUser| async move {
                HttpResponse::Ok().body(caller.user().email().as_str().to_owned())
            }),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, format!("Bearer {}", seeded.user_token)))
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let body = test::read_body(res).await;
        assert_eq!(body, "user@example.com".as_bytes());
    }
}
