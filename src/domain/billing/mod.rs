//! Billing domain module.
//!
//! Webhook deliveries from the billing provider: signature checks and the
//! typed events reconciled against local subscriptions.

mod errors;
mod event;
mod signature;

pub use errors::{PayloadError, WebhookError};
pub use event::{
    BillingEvent, EventData, EventEnvelope, EventKind, InvoicePayload, SubscriptionPayload,
    SubscriptionRef,
};
pub use signature::{sign_payload, SignatureHeader, SignatureVerifier};
