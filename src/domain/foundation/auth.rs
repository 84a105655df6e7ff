//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the `SessionValidator` port produces from a
//! bearer token. Nothing here depends on the identity provider.

use super::IdentityId;
use thiserror::Error;

/// Caller identity extracted from a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Account id issued by the identity provider.
    pub id: IdentityId,

    /// Email address from the token claims.
    pub email: String,
}

impl AuthenticatedUser {
    pub fn new(id: IdentityId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }

    /// Compares the caller's email with `email`, ignoring ASCII case and
    /// surrounding whitespace.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
