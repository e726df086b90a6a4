//! `Authorization: Basic` extractor resolving the current user.
//!
//! Handlers that take a [`CurrentUser`] argument only run for requests whose
//! credentials match a stored user; anything else short-circuits with
//! `401 Access Denied` through the error boundary.

use actix_web::http::header::{AUTHORIZATION, HeaderValue};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{BasicCredentials, Error, User};

use super::state::HttpState;

const ACCESS_DENIED: &str = "Access Denied";

/// Authenticated requester.
#[derive(Debug, Clone)]
pub struct CurrentUser(User);

impl CurrentUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

fn denied(reason: &'static str) -> Error {
    debug!(reason, "rejecting Authorization header");
    Error::unauthorized(ACCESS_DENIED)
}

/// Decode an `Authorization: Basic <base64(email:password)>` header.
///
/// # Examples
/// ```
/// use actix_web::http::header::HeaderValue;
/// use userbase::inbound::http::auth::parse_basic_credentials;
///
/// // base64("jane@example.com:secret1")
/// let header = HeaderValue::from_static("Basic amFuZUBleGFtcGxlLmNvbTpzZWNyZXQx");
/// let creds = parse_basic_credentials(Some(&header)).expect("well-formed header");
/// assert_eq!(creds.email(), "jane@example.com");
/// ```
pub fn parse_basic_credentials(header: Option<&HeaderValue>) -> Result<BasicCredentials, Error> {
    let header = header.ok_or_else(|| denied("missing header"))?;
    let raw = header.to_str().map_err(|_| denied("non-ascii header"))?;
    let (scheme, encoded) = raw
        .trim()
        .split_once(' ')
        .ok_or_else(|| denied("missing scheme"))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(denied("unsupported scheme"));
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| denied("invalid base64"))?;
    let decoded = String::from_utf8(decoded).map_err(|_| denied("invalid utf-8"))?;
    let (email, password) = decoded
        .split_once(':')
        .ok_or_else(|| denied("missing separator"))?;

    BasicCredentials::try_from_parts(email, password).map_err(|_| denied("blank credentials"))
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let credentials = parse_basic_credentials(req.headers().get(AUTHORIZATION));

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let credentials = credentials?;
            state
                .authenticator
                .authenticate(&credentials)
                .await
                .map(CurrentUser)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    fn basic(pair: &str) -> HeaderValue {
        header(&format!("Basic {}", STANDARD.encode(pair)))
    }

    #[rstest]
    #[case("Basic")]
    #[case("Bearer abc.def")]
    #[case("Basic !!!")]
    fn malformed_headers_are_denied(#[case] value: &str) {
        let err = parse_basic_credentials(Some(&header(value))).expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), ACCESS_DENIED);
    }

    #[rstest]
    #[case("jane@example.com")]
    #[case(":secret1")]
    #[case("jane@example.com:")]
    fn incomplete_pairs_are_denied(#[case] pair: &str) {
        let err = parse_basic_credentials(Some(&basic(pair))).expect_err("incomplete");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn missing_header_is_denied() {
        let err = parse_basic_credentials(None).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("Basic")]
    #[case("basic")]
    #[case("BASIC")]
    fn scheme_is_case_insensitive(#[case] scheme: &str) {
        let value = header(&format!(
            "{scheme} {}",
            STANDARD.encode("jane@example.com:pa:ss")
        ));
        let creds = parse_basic_credentials(Some(&value)).expect("valid");
        assert_eq!(creds.email(), "jane@example.com");
        assert_eq!(creds.password(), "pa:ss");
    }
}
