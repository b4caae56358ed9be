//! Request authentication extractors.
//!
//! Both extractors only establish *who* is calling. Neither compares the
//! caller with the user addressed by the path, so any authenticated identity
//! may modify or delete any account.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use user_lib::entities::{Session, User};

use crate::error::{handle_service_error, ApiError};
use crate::state::AppState;

/// A live session resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerSession(pub Session);

/// Accepted credentials for deletion: a bearer token or Basic credentials.
#[derive(Debug, Clone)]
pub enum DeleteAuthorization {
    Bearer(Session),
    Basic(User),
}

impl DeleteAuthorization {
    pub fn user_id(&self) -> u64 {
        match self {
            DeleteAuthorization::Bearer(session) => session.user_id,
            DeleteAuthorization::Basic(user) => user.id,
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            DeleteAuthorization::Bearer(_) => "bearer",
            DeleteAuthorization::Basic(_) => "basic",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Credentials {
    Bearer(String),
    Basic { username: String, password: String },
}

fn authorization_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_credentials(value: &str) -> Option<Credentials> {
    let (scheme, rest) = value.split_once(' ')?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }

    if scheme.eq_ignore_ascii_case("bearer") {
        return Some(Credentials::Bearer(rest.to_string()));
    }

    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = STANDARD.decode(rest).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        return Some(Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    None
}

async fn resolve_bearer(state: &AppState, token: &str) -> Result<Session, ApiError> {
    state
        .user_service
        .authenticate_token(token)
        .await
        .map_err(|e| handle_service_error(e, &state.env, "authenticate_token"))
}

impl FromRequestParts<AppState> for BearerSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = authorization_value(&parts.headers).ok_or_else(ApiError::missing_credentials)?;

        match parse_credentials(value) {
            Some(Credentials::Bearer(token)) => Ok(BearerSession(resolve_bearer(state, &token).await?)),
            _ => Err(ApiError::Unauthorized(
                "expected a bearer token".to_string(),
            )),
        }
    }
}

impl FromRequestParts<AppState> for DeleteAuthorization {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = authorization_value(&parts.headers).ok_or_else(ApiError::missing_credentials)?;

        match parse_credentials(value) {
            Some(Credentials::Bearer(token)) => {
                Ok(DeleteAuthorization::Bearer(resolve_bearer(state, &token).await?))
            }
            Some(Credentials::Basic { username, password }) => state
                .user_service
                .verify_credentials(&username, &password)
                .await
                .map(DeleteAuthorization::Basic)
                .map_err(|e| handle_service_error(e, &state.env, "verify_credentials")),
            None => Err(ApiError::invalid_credentials()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(
            parse_credentials("Bearer tok_abc"),
            Some(Credentials::Bearer("tok_abc".to_string()))
        );
        assert_eq!(
            parse_credentials("bearer   tok_abc"),
            Some(Credentials::Bearer("tok_abc".to_string()))
        );
        assert_eq!(parse_credentials("Bearer "), None);
    }

    #[test]
    fn test_parse_basic() {
        // "john_doe:password123"
        assert_eq!(
            parse_credentials("Basic am9obl9kb2U6cGFzc3dvcmQxMjM="),
            Some(Credentials::Basic {
                username: "john_doe".to_string(),
                password: "password123".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_basic_password_may_contain_colon() {
        let encoded = STANDARD.encode("alice:pa:ss");
        assert_eq!(
            parse_credentials(&format!("Basic {encoded}")),
            Some(Credentials::Basic {
                username: "alice".to_string(),
                password: "pa:ss".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_credentials("Basic not-base64!!"), None);
        assert_eq!(parse_credentials(&format!("Basic {}", STANDARD.encode("nocolon"))), None);
        assert_eq!(parse_credentials("Digest abc"), None);
        assert_eq!(parse_credentials("tok_without_scheme"), None);
    }

    #[test]
    fn test_authorization_value_ignores_blank_header() {
        let mut headers = HeaderMap::new();
        assert!(authorization_value(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("   "));
        assert!(authorization_value(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer x"));
        assert_eq!(authorization_value(&headers), Some("Bearer x"));
    }
}
