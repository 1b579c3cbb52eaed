//! Credential verification, token issuance and token resolution.

use std::sync::Arc;

use chrono::Duration;

use crate::error::{ApiError, ApiResult};

use super::jwt;
use super::store::CredentialStore;
use super::types::{Account, AuthConfig, BasicCredentials, TokenResponse};

const INVALID_LOGIN: &str = "Incorrect username or password";
const INVALID_TOKEN: &str = "Could not validate credentials";

/// Cost-12 bcrypt hash checked against when the username is unknown, so a
/// miss costs the same as a wrong password.
const DUMMY_HASH: &str = "$2b$12$EixZaYVK1fsbw1ZfbX3OXePaWxn96p36WQoeG6Lruj3vjPGga31lW";

type PasswordCheck = fn(&str, &str) -> bcrypt::BcryptResult<bool>;

fn bcrypt_check(password: &str, hash: &str) -> bcrypt::BcryptResult<bool> {
    bcrypt::verify(password, hash)
}

/// Checks credentials against the injected store and signs/validates
/// bearer tokens with the process-wide key. Cheap to clone.
#[derive(Clone)]
pub struct AuthGateway {
    store: Arc<CredentialStore>,
    config: AuthConfig,
    check_password: PasswordCheck,
}

impl AuthGateway {
    pub fn new(store: Arc<CredentialStore>, config: AuthConfig) -> Self {
        Self {
            store,
            config,
            check_password: bcrypt_check,
        }
    }

    #[cfg(test)]
    fn with_password_check(mut self, check: PasswordCheck) -> Self {
        self.check_password = check;
        self
    }

    /// Unknown user and wrong password produce the same error after the
    /// same amount of hashing work.
    pub fn verify_credentials(&self, username: &str, password: &str) -> ApiResult<Account> {
        let Some(account) = self.store.lookup(username) else {
            let _ = (self.check_password)(password, DUMMY_HASH);
            tracing::warn!("Login attempt for unknown user {}", username);
            return Err(ApiError::invalid_credentials(INVALID_LOGIN));
        };

        match (self.check_password)(password, &account.hashed_password) {
            Ok(true) => Ok(account.clone()),
            Ok(false) => {
                tracing::warn!("Wrong password for user {}", username);
                Err(ApiError::invalid_credentials(INVALID_LOGIN))
            }
            Err(e) => {
                tracing::error!("Stored hash for {} is unusable: {}", username, e);
                Err(ApiError::invalid_credentials(INVALID_LOGIN))
            }
        }
    }

    /// Sign a token for `account`; `ttl` falls back to the configured lifetime.
    pub fn issue_token(
        &self,
        account: &Account,
        ttl: Option<Duration>,
    ) -> ApiResult<TokenResponse> {
        let ttl = ttl.unwrap_or_else(|| self.config.token_ttl());
        let token = jwt::create_token(&self.config, &account.username, ttl)?;

        tracing::debug!(
            "Issued token for {} valid for {}s",
            account.username,
            ttl.num_seconds()
        );
        Ok(TokenResponse::bearer(token))
    }

    /// Malformed, forged and expired tokens are indistinguishable to the caller.
    pub fn resolve_identity(&self, token: &str) -> ApiResult<Account> {
        let claims = jwt::validate_token(&self.config, token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            ApiError::invalid_credentials(INVALID_TOKEN)
        })?;

        let subject = claims
            .sub
            .ok_or_else(|| ApiError::invalid_credentials(INVALID_TOKEN))?;

        self.store
            .lookup(&subject)
            .cloned()
            .ok_or_else(|| ApiError::invalid_credentials(INVALID_TOKEN))
    }

    pub fn gate_active(account: Account) -> ApiResult<Account> {
        if account.disabled {
            return Err(ApiError::InactiveAccount);
        }
        Ok(account)
    }

    /// Inline (HTTP Basic) scheme: the submitted claim is echoed back
    /// without any check against the store. Inspection only, not security.
    pub fn verify_inline_credentials(username: &str, password: &str) -> BasicCredentials {
        BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::types::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::cell::RefCell;

    thread_local! {
        static CHECKED_HASHES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn recording_check(password: &str, hash: &str) -> bcrypt::BcryptResult<bool> {
        CHECKED_HASHES.with(|seen| seen.borrow_mut().push(hash.to_string()));
        bcrypt::verify(password, hash)
    }

    pub(crate) fn test_account(username: &str, password: &str, disabled: bool) -> Account {
        Account {
            username: username.to_string(),
            full_name: Some(format!("{} full", username)),
            email: Some(format!("{}@example.com", username)),
            hashed_password: bcrypt::hash(password, 4).unwrap(),
            disabled,
        }
    }

    pub(crate) fn test_gateway() -> AuthGateway {
        let store = CredentialStore::new(vec![
            test_account("johndoe", "secret", false),
            test_account("alice", "wonderland", true),
        ])
        .unwrap();
        AuthGateway::new(
            Arc::new(store),
            AuthConfig {
                jwt_secret: "gateway-test-secret".to_string(),
                token_ttl_minutes: 30,
            },
        )
    }

    #[test]
    fn test_correct_password_returns_account() {
        let gateway = test_gateway();
        for (user, pass) in [("johndoe", "secret"), ("alice", "wonderland")] {
            let account = gateway.verify_credentials(user, pass).expect("should verify");
            assert_eq!(account.username, user);
        }
    }

    #[test]
    fn test_demo_store_password() {
        let gateway = AuthGateway::new(Arc::new(CredentialStore::demo()), AuthConfig::default());
        let account = gateway.verify_credentials("johndoe", "secret").unwrap();
        assert_eq!(account.full_name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_the_same() {
        let gateway = test_gateway();
        let wrong = gateway.verify_credentials("johndoe", "wonderland").unwrap_err();
        let unknown = gateway.verify_credentials("mallory", "secret").unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, ApiError::InvalidCredentials(_)));
        assert!(gateway.verify_credentials("johndoe", "").is_err());
        assert!(gateway.verify_credentials("johndoe", "Secret").is_err());
    }

    #[test]
    fn test_unknown_user_still_checks_a_hash() {
        let gateway = test_gateway().with_password_check(recording_check);
        CHECKED_HASHES.with(|seen| seen.borrow_mut().clear());

        assert!(gateway.verify_credentials("mallory", "secret").is_err());
        assert!(gateway.verify_credentials("johndoe", "wrong").is_err());

        let seen = CHECKED_HASHES.with(|seen| seen.borrow().clone());
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], DUMMY_HASH);
        assert_ne!(seen[1], DUMMY_HASH);
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        assert!(bcrypt::verify("not-a-user", DUMMY_HASH).is_ok());
    }

    #[test]
    fn test_out_of_range_ttl_is_internal_error() {
        let gateway = test_gateway();
        let account = test_account("johndoe", "secret", false);
        let err = gateway
            .issue_token(&account, Some(Duration::days(365 * 1_000_000)))
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_token_round_trip() {
        let gateway = test_gateway();
        let account = gateway.verify_credentials("johndoe", "secret").unwrap();
        let token = gateway.issue_token(&account, None).unwrap();
        assert_eq!(token.token_type, "bearer");

        let resolved = gateway.resolve_identity(&token.access_token).unwrap();
        assert_eq!(resolved, account);
    }

    #[test]
    fn test_expired_token_rejected() {
        let gateway = test_gateway();
        let account = gateway.verify_credentials("johndoe", "secret").unwrap();
        let token = gateway
            .issue_token(&account, Some(Duration::seconds(-1)))
            .unwrap();

        let err = gateway.resolve_identity(&token.access_token).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials(_)));
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let gateway = test_gateway();
        let other = AuthGateway::new(
            Arc::new(CredentialStore::new(vec![test_account("johndoe", "secret", false)]).unwrap()),
            AuthConfig {
                jwt_secret: "some-other-key".to_string(),
                token_ttl_minutes: 30,
            },
        );
        let account = other.verify_credentials("johndoe", "secret").unwrap();
        let token = other.issue_token(&account, None).unwrap();

        assert!(gateway.resolve_identity(&token.access_token).is_err());
    }

    #[test]
    fn test_token_without_subject_rejected() {
        let gateway = test_gateway();
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: None,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"gateway-test-secret"),
        )
        .unwrap();

        assert!(gateway.resolve_identity(&token).is_err());
    }

    #[test]
    fn test_token_for_unknown_subject_rejected() {
        let gateway = test_gateway();
        let ghost = test_account("ghost", "boo", false);
        let token = gateway.issue_token(&ghost, None).unwrap();

        assert!(gateway.resolve_identity(&token.access_token).is_err());
    }

    #[test]
    fn test_gate_active() {
        let active = test_account("johndoe", "secret", false);
        assert_eq!(AuthGateway::gate_active(active.clone()).unwrap(), active);

        let disabled = test_account("alice", "wonderland", true);
        assert!(matches!(
            AuthGateway::gate_active(disabled),
            Err(ApiError::InactiveAccount)
        ));
    }

    #[test]
    fn test_inline_credentials_echoed() {
        let claim = AuthGateway::verify_inline_credentials("anyone", "p:a:ss");
        assert_eq!(claim.username, "anyone");
        assert_eq!(claim.password, "p:a:ss");
    }
}
