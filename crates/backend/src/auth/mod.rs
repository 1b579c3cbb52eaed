//! Authentication module for the demo login flows.
//!
//! This module provides:
//! - An in-memory, read-only credential store
//! - bcrypt credential verification and HS256 JWT issuance/validation
//! - `require_auth` middleware resolving the caller from a bearer token
//! - An HTTP Basic echo scheme for inspecting submitted credentials

mod gateway;
mod handlers;
mod jwt;
mod middleware;
mod store;
pub mod types;

pub use gateway::AuthGateway;
pub use handlers::{login_for_access_token, read_basic_user, read_users_me};
pub use middleware::{extract_basic_credentials, require_auth};
pub use store::CredentialStore;

#[cfg(test)]
pub(crate) use gateway::tests as test_support;
