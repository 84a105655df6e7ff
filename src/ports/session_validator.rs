//! Session validation port.
//!
//! Turns a bearer token issued by the identity provider into an
//! [`AuthenticatedUser`]. HTTP middleware calls this once per request.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts the caller's identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature and expiry
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
