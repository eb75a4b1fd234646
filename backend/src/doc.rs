//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: every
//! endpoint from the inbound layer, the request/response DTO schemas, the
//! error envelope, and the bearer-token security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::complaints::{
    ComplaintResponse, CreateComplaintRequest, DeletedComplaintResponse, OwnerContactResponse,
    UpdateComplaintRequest,
};
use crate::inbound::http::users::{IdentityResponse, LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Session token issued by POST /api/v1/users/register or /login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Grievance tracker backend API",
        description = "HTTP interface for filing and triaging insurance policy complaints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::get_complaint,
        crate::inbound::http::complaints::update_complaint,
        crate::inbound::http::complaints::delete_complaint,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        IdentityResponse,
        UserResponse,
        CreateComplaintRequest,
        UpdateComplaintRequest,
        ComplaintResponse,
        OwnerContactResponse,
        DeletedComplaintResponse,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "users", description = "Registration, login, and identity"),
        (name = "complaints", description = "Filing and triaging complaints"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
