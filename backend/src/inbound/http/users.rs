//! User API handlers: registration, login, and current identity.
//!
//! ```text
//! POST /api/v1/users/register {"name":"Ada","email":"ada@example.com","password":"secret"}
//! POST /api/v1/users/login    {"email":"ada@example.com","password":"secret"}
//! GET  /api/v1/users/me       (Authorization: Bearer <token>)
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedIdentity, Error, LoginCredentials, LoginValidationError, RegistrationDetails,
    RegistrationValidationError, User, UserValidationError,
};

use super::bearer::AuthenticatedUser;
use super::error::ApiResult;
use super::state::HttpState;

/// Request body for `POST /api/v1/users/register`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name for the new account.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Plaintext password; stored only as an Argon2 hash.
    pub password: String,
}

/// Request body for `POST /api/v1/users/login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Identity payload returned by registration and login, token included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// `user` or `admin`.
    pub role: String,
    /// Signed bearer token, valid for five days.
    pub token: String,
}

impl IdentityResponse {
    fn from_identity(identity: &AuthenticatedIdentity) -> Self {
        Self {
            id: identity.user.id().to_string(),
            name: identity.user.name().as_str().to_owned(),
            email: identity.user.email().as_str().to_owned(),
            role: identity.user.role().as_str().to_owned(),
            token: identity.token.clone(),
        }
    }
}

/// Identity payload returned by `GET /api/v1/users/me`, no token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// `user` or `admin`.
    pub role: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            role: user.role().as_str().to_owned(),
        }
    }
}

fn identity_field(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
    }
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let field = match &err {
        RegistrationValidationError::Identity(identity) => identity_field(identity),
        RegistrationValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_login_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a new account and issue a session token.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = IdentityResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        RegistrationDetails::try_from_parts(&payload.name, &payload.email, &payload.password)
            .map_err(map_registration_error)?;
    let identity = state.auth.register(&details).await?;
    Ok(HttpResponse::Created().json(IdentityResponse::from_identity(&identity)))
}

/// Authenticate stored credentials and issue a session token.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = IdentityResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Wrong credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_login_error)?;
    let identity = state.auth.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(IdentityResponse::from_identity(&identity)))
}

/// Return the identity behind the presented bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current identity", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(caller: AuthenticatedUser) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(UserResponse::from_user(caller.user())))
}
