//! Users API handlers.
//!
//! ```text
//! GET  /api/users   Authorization: Basic base64(email:password)
//! POST /api/users   {"firstName":"Jane","lastName":"Doe","emailAddress":"jane@example.com","password":"secret1"}
//! ```
//!
//! Both routes also answer on the trailing-slash form `/api/users/`.

use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, mime, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::RegistrationOutcome;
use crate::domain::{Error, RegistrationInput, UserProfile};

use super::ApiResult;
use super::auth::CurrentUser;
use super::state::HttpState;

const INVALID_JSON_MESSAGE: &str = "Request body must be valid JSON";

/// Registration body for `POST /api/users`.
///
/// Every field accepts any JSON value. `null`, `false`, `0`, `""`, arrays,
/// objects and absent keys all count as "no value"; strings are taken
/// verbatim and other scalars are stringified.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Jane")]
    pub first_name: Value,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Doe")]
    pub last_name: Value,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "jane@example.com")]
    pub email_address: Value,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "secret1")]
    pub password: Value,
}

impl RegistrationRequest {
    /// Parse a raw body. An empty body or a non-object JSON document yields
    /// a request with every field absent; only unparseable JSON is an error.
    fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let document: Value = serde_json::from_slice(body)?;
        Ok(serde_json::from_value(document).unwrap_or_default())
    }
}

/// Only `application/json` bodies are read; anything else registers as an
/// empty form.
fn declares_json(req: &HttpRequest) -> bool {
    matches!(
        req.mime_type(),
        Ok(Some(declared))
            if declared.type_() == mime::APPLICATION && declared.subtype() == mime::JSON
    )
}

fn coerce(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => None,
        Value::Bool(true) => Some(true.to_string()),
        Value::Number(number) if number.as_f64().is_some_and(|n| n == 0.0) => None,
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
    }
}

impl From<RegistrationRequest> for RegistrationInput {
    fn from(request: RegistrationRequest) -> Self {
        Self {
            first_name: coerce(request.first_name),
            last_name: coerce(request.last_name),
            email_address: coerce(request.email_address),
            password: coerce(request.password).map(Zeroizing::new),
        }
    }
}

fn registration_response(outcome: RegistrationOutcome) -> HttpResponse {
    match outcome {
        RegistrationOutcome::Created(_) => HttpResponse::Created()
            .insert_header((header::LOCATION, "/"))
            .finish(),
        RegistrationOutcome::Rejected(messages) => HttpResponse::BadRequest().json(messages),
    }
}

/// Profile of the authenticated user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid credentials", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("basicAuth" = []))
)]
pub async fn current_user(user: CurrentUser) -> web::Json<UserProfile> {
    web::Json(UserProfile::from(user.user()))
}

/// Register a new user.
///
/// Responds `201` with `Location: /` and an empty body, or `400` with the
/// list of validation messages in rule order.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "User created", headers(("Location" = String, description = "Always `/`"))),
        (status = 400, description = "Validation failed, one message per failing rule", body = [String]),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
pub async fn register_user(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let request = if declares_json(&req) {
        match RegistrationRequest::from_body(&body) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "registration body is not JSON");
                return Ok(registration_response(RegistrationOutcome::Rejected(vec![
                    INVALID_JSON_MESSAGE.to_owned(),
                ])));
            }
        }
    } else {
        debug!(content_type = ?req.headers().get(header::CONTENT_TYPE), "ignoring non-JSON body");
        RegistrationRequest::default()
    };

    let outcome = state.registration.register(request.into()).await?;
    Ok(registration_response(outcome))
}

/// Mount the users resource under `/api/users`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users").service(
            web::resource(["", "/"])
                .route(web::get().to(current_user))
                .route(web::post().to(register_user)),
        ),
    );
}
