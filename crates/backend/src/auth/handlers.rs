//! Authentication HTTP handlers.

use axum::{
    extract::State,
    http::HeaderMap,
    Extension, Form, Json,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::{
    extract_basic_credentials,
    gateway::AuthGateway,
    types::{AuthenticatedIdentity, BasicCredentials, TokenResponse, UserProfile},
};

/// OAuth2 password-grant form body.
#[derive(Debug, Deserialize)]
pub struct TokenRequestForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
}

/// Exchange a username and password for a bearer token.
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequestForm>,
) -> ApiResult<Json<TokenResponse>> {
    if let Some(grant) = form.grant_type.as_deref() {
        if grant != "password" {
            return Err(ApiError::bad_request(format!(
                "Unsupported grant_type: {}",
                grant
            )));
        }
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    let gateway = state.gateway.clone();
    let TokenRequestForm {
        username, password, ..
    } = form;
    let account =
        tokio::task::spawn_blocking(move || gateway.verify_credentials(&username, &password))
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Password check failed: {}", e)))??;

    let token = state.gateway.issue_token(&account, None)?;
    tracing::info!("Successful login for: {}", account.username);

    Ok(Json(token))
}

/// Get current authenticated user info. Requires `require_auth` in front.
pub async fn read_users_me(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Json<UserProfile> {
    Json(identity.account.profile())
}

/// Echo HTTP Basic credentials back verbatim. Performs no verification.
pub async fn read_basic_user(headers: HeaderMap) -> ApiResult<Json<BasicCredentials>> {
    let (username, password) = extract_basic_credentials(&headers)?;
    Ok(Json(AuthGateway::verify_inline_credentials(
        &username, &password,
    )))
}
