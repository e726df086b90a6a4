//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI at `/docs` in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, UserProfile};
use crate::inbound::http::users::RegistrationRequest;

/// Registers the HTTP Basic scheme used by `GET /api/users`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "basicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "userbase API",
        description = "Current-user lookup and user registration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::register_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(UserProfile, RegistrationRequest, Error, ErrorCode)),
    tags(
        (name = "users", description = "User lookup and registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
