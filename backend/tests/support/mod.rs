//! Shared fixtures for API integration tests.
//!
//! Assembles the full HTTP surface over the in-memory adapters, the way
//! the server does when no database is configured. Admin accounts are
//! provisioned directly in the store because the public API never creates
//! them.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, web, App, Error};
use chrono::Utc;
use serde_json::{json, Value};

use backend::domain::ports::UserRepository;
use backend::domain::{
    password, AccountService, ComplaintService, DisplayName, EmailAddress, Role, TokenCodec,
    User, UserId,
};
use backend::inbound::http::complaints::{
    create_complaint, delete_complaint, get_complaint, list_complaints, update_complaint,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login, register};
use backend::middleware::Trace;
use backend::outbound::memory::{InMemoryComplaintRepository, InMemoryUserRepository};

/// Signing secret shared by the app under test and token-forging helpers.
pub const TEST_SECRET: &[u8] = b"integration-signing-secret";

/// The assembled backend plus handles the tests need for seeding.
pub struct TestBackend {
    /// HTTP state bundle for [`app`].
    pub state: HttpState,
    /// Codec sharing the app's signing secret.
    pub codec: TokenCodec,
    users: Arc<InMemoryUserRepository>,
}

impl TestBackend {
    /// Assemble the backend over empty in-memory stores.
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let complaints = Arc::new(InMemoryComplaintRepository::new(users.clone()));
        let codec = TokenCodec::from_secret(TEST_SECRET);

        let auth = Arc::new(AccountService::new(users.clone(), codec.clone()));
        let service = Arc::new(ComplaintService::new(complaints));
        let state = HttpState::new(auth, service.clone(), service);

        Self {
            state,
            codec,
            users,
        }
    }

    /// Provision an admin account directly in the store and return a
    /// bearer token for it.
    pub async fn seed_admin(&self, email: &str) -> String {
        let admin = User::new(
            UserId::random(),
            DisplayName::new("Admin").expect("valid fixture name"),
            EmailAddress::new(email).expect("valid fixture email"),
            Role::Admin,
        );
        let hash = password::hash("admin-password").expect("fixture password hashes");
        self.users
            .insert(&admin, &hash)
            .await
            .expect("fixture admin inserts");
        self.codec
            .issue(admin.id(), Utc::now())
            .expect("fixture token issues")
    }
}

/// Build the full API surface as a test application.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).wrap(Trace).service(
        web::scope("/api/v1")
            .service(register)
            .service(login)
            .service(current_user)
            .service(list_complaints)
            .service(create_complaint)
            .service(get_complaint)
            .service(update_complaint)
            .service(delete_complaint),
    )
}

/// Register an account over HTTP, returning the identity payload.
pub async fn register_account<S>(app: &S, name: &str, email: &str, password: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(&json!({ "name": name, "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(res).await
}

/// File a complaint over HTTP, returning the complaint payload.
pub async fn file_complaint<S>(app: &S, token: &str, category: &str, title: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/complaints")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(&json!({
                "policyNumber": "POL-1234",
                "category": category,
                "title": title,
                "description": "Something went wrong with the policy",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    test::read_body_json(res).await
}
