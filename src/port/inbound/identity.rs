//! Identity collaborator contract.
//!
//! The core never authenticates anyone. A driver hands it a credential, an
//! [`IdentityProvider`] turns that into a [`VerifiedUser`], and the core
//! trusts that user as the wagering party.

use serde::Serialize;

use crate::domain::id::UserId;
use crate::error::IdentityError;

/// A user whose identity has been established by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VerifiedUser {
    pub user_id: UserId,
}

/// Resolves opaque credentials to verified users.
pub trait IdentityProvider: Send + Sync {
    /// Yield the verified user behind `credential`.
    ///
    /// # Errors
    /// [`IdentityError::Unauthenticated`] if the credential is unknown.
    fn authenticate(&self, credential: &str) -> Result<VerifiedUser, IdentityError>;
}
