//! Webhook error types.
//!
//! Every rejection of a delivery is a 400 so the provider does not retry
//! a request that will never succeed; only unexpected failures are 500.

use http::StatusCode;
use thiserror::Error;

/// Errors that reject a webhook delivery before any event is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("Missing Stripe signature")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed more than five minutes ago.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed in the future beyond the allowed clock skew.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Signature header or envelope could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Webhook integration not configured")]
    NotConfigured,

    #[error("Webhook integration disabled")]
    Disabled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// A known event kind whose object failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {event_type} payload: {reason}")]
pub struct PayloadError {
    pub event_type: String,
    pub reason: String,
}

impl PayloadError {
    pub fn new(event_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            reason: reason.into(),
        }
    }
}
