//! Bearer-token identity registry.
//!
//! Issues opaque random tokens for users and resolves them back. Stands in
//! for whatever authentication front end sits ahead of the core.

use dashmap::DashMap;
use tracing::debug;

use crate::domain::id::UserId;
use crate::error::IdentityError;
use crate::port::inbound::identity::{IdentityProvider, VerifiedUser};

/// In-process token registry.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: DashMap<String, UserId>,
}

impl TokenRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `user`.
    pub fn issue(&self, user: UserId) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user);
        debug!(user = %user, "Issued bearer token");
        token
    }

    /// Revoke a token. Returns `true` if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }
}

impl IdentityProvider for TokenRegistry {
    fn authenticate(&self, credential: &str) -> Result<VerifiedUser, IdentityError> {
        let token = credential
            .strip_prefix("Bearer ")
            .unwrap_or(credential)
            .trim();
        self.tokens
            .get(token)
            .map(|entry| VerifiedUser {
                user_id: *entry.value(),
            })
            .ok_or(IdentityError::Unauthenticated)
    }
}
