//! Read-only credential table.
//!
//! Built once at startup, either from the built-in demo accounts or from a
//! TOML accounts file, then shared behind an `Arc`. There is no mutation API.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::types::Account;

/// bcrypt hash of `secret`, shared by the demo accounts.
const DEMO_PASSWORD_HASH: &str = "$2b$12$EixZaYVK1fsbw1ZfbX3OXePaWxn96p36WQoeG6Lruj3vjPGga31lW";

#[derive(Debug, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: Vec<Account>,
}

#[derive(Debug)]
pub struct CredentialStore {
    accounts: HashMap<String, Account>,
}

impl CredentialStore {
    /// Build a store, rejecting duplicate usernames.
    pub fn new(accounts: Vec<Account>) -> anyhow::Result<Self> {
        let mut table = HashMap::with_capacity(accounts.len());
        for account in accounts {
            if account.username.is_empty() {
                anyhow::bail!("account with empty username");
            }
            if table.contains_key(&account.username) {
                anyhow::bail!("duplicate username: {}", account.username);
            }
            table.insert(account.username.clone(), account);
        }
        Ok(Self { accounts: table })
    }

    /// The two built-in accounts: `johndoe` (active) and `alice` (disabled).
    pub fn demo() -> Self {
        let accounts = [
            Account {
                username: "johndoe".to_string(),
                full_name: Some("John Doe".to_string()),
                email: Some("johndoe@example.com".to_string()),
                hashed_password: DEMO_PASSWORD_HASH.to_string(),
                disabled: false,
            },
            Account {
                username: "alice".to_string(),
                full_name: Some("Alice Wonderson".to_string()),
                email: Some("alice@example.com".to_string()),
                hashed_password: DEMO_PASSWORD_HASH.to_string(),
                disabled: true,
            },
        ];

        Self {
            accounts: accounts
                .into_iter()
                .map(|a| (a.username.clone(), a))
                .collect(),
        }
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let file: AccountsFile = toml::from_str(raw).context("Invalid accounts file")?;
        Self::new(file.accounts)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read accounts file {}", path.display()))?;
        let store = Self::from_toml_str(&raw)?;
        if store.is_empty() {
            tracing::warn!("Accounts file {} defines no accounts", path.display());
        }
        tracing::info!("Loaded {} accounts from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn lookup(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
