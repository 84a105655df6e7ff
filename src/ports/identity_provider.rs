//! Identity provider admin port.
//!
//! Account creation and removal on the hosted identity service. Used only
//! by trainer provisioning; sign-in itself never passes through here.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, IdentityId};

/// Account to create on the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    /// Display name stored as account metadata.
    pub name: String,
    /// Mark the email as confirmed so the account can sign in immediately.
    pub email_confirmed: bool,
}

/// Admin operations on identity-provider accounts.
///
/// # Errors
///
/// Failures carry `ErrorCode::IdentityProviderError` with the provider's
/// own message so it can be shown to the administrator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and returns its id.
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, DomainError>;

    /// Deletes an account. Used to undo `create_user` when a later step fails.
    async fn delete_user(&self, id: &IdentityId) -> Result<(), DomainError>;
}
