//! Billing handlers.
//!
//! Reconciliation of billing-provider webhook deliveries.

mod reconcile_webhook;

pub use reconcile_webhook::{ReceiveWebhookCommand, ReconcileOutcome, ReconcileWebhookHandler};
