//! Shared fixtures for HTTP handler tests.
//!
//! Builds the full handler surface over the in-memory adapters with a fixed
//! signing secret and two seeded accounts (password `password` each):
//! `user@example.com`, `second@example.com` (role `user`) and
//! `admin@example.com` (role `admin`).

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};
use chrono::Utc;

use crate::domain::{
    password, AccountService, ComplaintService, DisplayName, EmailAddress, Role, TokenCodec,
    User, UserId,
};
use crate::domain::ports::UserRepository;
use crate::middleware::Trace;
use crate::outbound::memory::{InMemoryComplaintRepository, InMemoryUserRepository};

use super::complaints::{
    create_complaint, delete_complaint, get_complaint, list_complaints, update_complaint,
};
use super::state::HttpState;
use super::users::{current_user, login, register};

const TEST_SECRET: &[u8] = b"test-signing-secret";

/// Fixture state plus ready-made bearer tokens for the seeded accounts.
pub(crate) struct SeededState {
    pub state: HttpState,
    pub user_token: String,
    pub second_user_token: String,
    pub admin_token: String,
}

async fn seed_user(
    users: &InMemoryUserRepository,
    codec: &TokenCodec,
    name: &str,
    email: &str,
    role: Role,
) -> String {
    let user = User::new(
        UserId::random(),
        DisplayName::new(name).expect("valid fixture name"),
        EmailAddress::new(email).expect("valid fixture email"),
        role,
    );
    let hash = password::hash("password").expect("fixture password hashes");
    users
        .insert(&user, &hash)
        .await
        .expect("fixture user inserts");
    codec
        .issue(user.id(), Utc::now())
        .expect("fixture token issues")
}

/// Build an [`HttpState`] over in-memory stores with seeded accounts.
pub(crate) async fn seeded_state() -> SeededState {
    let users = Arc::new(InMemoryUserRepository::new());
    let complaints = Arc::new(InMemoryComplaintRepository::new(users.clone()));
    let codec = TokenCodec::from_secret(TEST_SECRET);

    let user_token = seed_user(&users, &codec, "Regular User", "user@example.com", Role::User)
        .await;
    let second_user_token = seed_user(
        &users,
        &codec,
        "Second User",
        "second@example.com",
        Role::User,
    )
    .await;
    let admin_token =
        seed_user(&users, &codec, "Admin", "admin@example.com", Role::Admin).await;

    let auth = Arc::new(AccountService::new(users, codec));
    let service = Arc::new(ComplaintService::new(complaints));
    let state = HttpState::new(auth, service.clone(), service);

    SeededState {
        state,
        user_token,
        second_user_token,
        admin_token,
    }
}

/// Build the full API surface as a test application.
pub(crate) fn test_app(
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
