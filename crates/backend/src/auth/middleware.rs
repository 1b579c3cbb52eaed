//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::gateway::AuthGateway;
use super::types::AuthenticatedIdentity;

/// Middleware function that requires a valid bearer token for an active account.
///
/// Use with `axum::middleware::from_fn_with_state`. On success the resolved
/// `AuthenticatedIdentity` is placed in the request extensions for the
/// handler to pick up with `Extension<AuthenticatedIdentity>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::invalid_credentials("Not authenticated"))?;

    let account = state.gateway.resolve_identity(token)?;
    let account = AuthGateway::gate_active(account)?;

    request
        .extensions_mut()
        .insert(AuthenticatedIdentity { account });

    Ok(next.run(request).await)
}

fn split_scheme<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (given, rest) = value.split_once(' ')?;
    if !given.eq_ignore_ascii_case(scheme) {
        return None;
    }
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    split_scheme(headers, "Bearer")
}

/// Decode `Authorization: Basic base64(user:pass)`.
///
/// Only the first `:` separates; the password may contain more.
pub fn extract_basic_credentials(headers: &HeaderMap) -> ApiResult<(String, String)> {
    let encoded = split_scheme(headers, "Basic").ok_or(ApiError::BasicAuthRequired)?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::BasicAuthRequired)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::BasicAuthRequired)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(ApiError::BasicAuthRequired)?;

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_basic_extraction() {
        let encoded = STANDARD.encode("johndoe:pa:ss");
        let (user, pass) =
            extract_basic_credentials(&headers_with(&format!("Basic {}", encoded))).unwrap();
        assert_eq!(user, "johndoe");
        assert_eq!(pass, "pa:ss");
    }

    #[test]
    fn test_basic_extraction_failures() {
        assert!(matches!(
            extract_basic_credentials(&HeaderMap::new()),
            Err(ApiError::BasicAuthRequired)
        ));
        assert!(extract_basic_credentials(&headers_with("Basic !!!")).is_err());
        let no_colon = STANDARD.encode("johndoe");
        assert!(extract_basic_credentials(&headers_with(&format!("Basic {}", no_colon))).is_err());
    }
}
