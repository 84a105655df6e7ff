//! Mock identity adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `IdentityProvider`
//! ports without a running identity service.
//!
//! # Example
//!
//! ```ignore
//! use trainer_hub::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new()
//!     .with_test_user("admin-token", "admin@trainerhub.com");
//!
//! let user = validator.validate("admin-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, DomainError, ErrorCode, IdentityId,
};
use crate::ports::{IdentityProvider, NewIdentity, SessionValidator};

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Error returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a user whose identity id is derived from the email.
    pub fn with_test_user(self, token: impl Into<String>, email: &str) -> Result<Self, DomainError> {
        let id = IdentityId::new(format!("identity-{}", email))?;
        Ok(self.with_user(token, AuthenticatedUser::new(id, email)))
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mock identity provider for testing.
///
/// Keeps created accounts in memory, keyed by generated id, and can be told
/// to reject creation with a fixed provider message.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<IdentityId, NewIdentity>>,
    next_id: RwLock<u64>,
    reject_with: RwLock<Option<String>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `create_user` fail with `message`.
    pub fn rejecting(self, message: impl Into<String>) -> Self {
        *self
            .reject_with
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
        self
    }

    /// Number of accounts that currently exist.
    pub fn account_count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Looks up a live account by email.
    pub fn find_by_email(&self, email: &str) -> Option<(IdentityId, NewIdentity)> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(_, account)| account.email.eq_ignore_ascii_case(email))
            .map(|(id, account)| (id.clone(), account.clone()))
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, DomainError> {
        if let Some(message) = self
            .reject_with
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(DomainError::new(ErrorCode::IdentityProviderError, message));
        }

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&identity.email))
        {
            return Err(DomainError::new(
                ErrorCode::IdentityProviderError,
                "A user with this email address has already been registered",
            ));
        }

        let mut next_id = self.next_id.write().unwrap_or_else(PoisonError::into_inner);
        *next_id += 1;
        let id = IdentityId::new(format!("mock-identity-{}", *next_id))?;
        accounts.insert(id.clone(), identity.clone());
        Ok(id)
    }

    async fn delete_user(&self, id: &IdentityId) -> Result<(), DomainError> {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::new(ErrorCode::IdentityProviderError, "User not found"))
    }
}
