//! Token authentication
//!
//! Bearer tokens map to user IDs. The static backend is seeded from
//! configuration; session issuance is handled by an external identity
//! provider and is out of scope here.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Resolved identity for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Resolves a bearer token to a user. Returns `Ok(None)` for unknown tokens.
#[async_trait]
pub trait AuthService: Send + Sync + std::fmt::Debug {
    async fn authenticate(&self, token: &str) -> Result<Option<AuthenticatedUser>, DomainError>;
}

/// Token table seeded at startup
#[derive(Debug, Default)]
pub struct StaticTokenAuth {
    tokens: RwLock<HashMap<String, String>>,
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from `token=user_id` entries
    pub fn from_entries(entries: &[String]) -> Result<Self, DomainError> {
        let auth = Self::new();

        for entry in entries {
            let (token, user_id) = entry.split_once('=').ok_or_else(|| {
                DomainError::configuration(format!(
                    "Invalid auth token entry '{}': expected token=user_id",
                    entry
                ))
            })?;

            auth.insert(token, user_id)?;
        }

        Ok(auth)
    }

    pub fn insert(&self, token: &str, user_id: &str) -> Result<(), DomainError> {
        if token.is_empty() || user_id.is_empty() {
            return Err(DomainError::configuration(
                "Auth token and user ID must be non-empty",
            ));
        }

        self.tokens
            .write()
            .map_err(|e| DomainError::internal(format!("Token table lock poisoned: {}", e)))?
            .insert(token.to_string(), user_id.to_string());

        Ok(())
    }
}

#[async_trait]
impl AuthService for StaticTokenAuth {
    async fn authenticate(&self, token: &str) -> Result<Option<AuthenticatedUser>, DomainError> {
        let tokens = self
            .tokens
            .read()
            .map_err(|e| DomainError::internal(format!("Token table lock poisoned: {}", e)))?;

        Ok(tokens.get(token).map(AuthenticatedUser::new))
    }
}
