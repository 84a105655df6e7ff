//! ReconcileWebhookHandler - applies billing-provider events to local rows.
//!
//! Deliveries are at-least-once and may arrive out of order. Every event
//! overwrites fields with the values in its own payload, so replays
//! converge and the last write wins.
//!
//! Once the envelope parses the delivery is acknowledged, whatever happens
//! while applying it. Lookup misses and store failures are logged and the
//! event is dropped.

use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::domain::billing::{
    BillingEvent, EventEnvelope, InvoicePayload, SignatureVerifier, SubscriptionPayload,
    WebhookError,
};
use crate::domain::foundation::{PaymentId, SubscriptionId};
use crate::domain::subscription::{PaymentRecord, Subscription};
use crate::ports::{PaymentHistoryRepository, SubscriptionRepository, WebhookConfigReader};

/// A raw delivery as received over HTTP.
#[derive(Debug, Clone)]
pub struct ReceiveWebhookCommand {
    pub signature: Option<String>,
    pub payload: Vec<u8>,
}

/// What applying one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    SubscriptionUpdated { subscription_id: SubscriptionId },
    /// The row already matched the payload.
    Unchanged { subscription_id: SubscriptionId },
    PaymentRecorded {
        subscription_id: SubscriptionId,
        payment_id: PaymentId,
    },
    /// Event kind we do not act on.
    Ignored { event_type: String },
    SubscriptionNotFound { external_id: String },
    /// Known kind whose payload failed validation.
    Invalid { reason: String },
    StoreFailed { reason: String },
}

pub struct ReconcileWebhookHandler {
    provider: String,
    configs: Arc<dyn WebhookConfigReader>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    payments: Arc<dyn PaymentHistoryRepository>,
}

impl ReconcileWebhookHandler {
    pub fn new(
        provider: impl Into<String>,
        configs: Arc<dyn WebhookConfigReader>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        payments: Arc<dyn PaymentHistoryRepository>,
    ) -> Self {
        Self {
            provider: provider.into(),
            configs,
            subscriptions,
            payments,
        }
    }

    /// Checks the delivery, parses it and applies the event.
    ///
    /// # Errors
    ///
    /// Only delivery-level problems are errors: a missing or bad signature,
    /// a missing or disabled integration, or an unparseable envelope.
    pub async fn receive(&self, cmd: ReceiveWebhookCommand) -> Result<ReconcileOutcome, WebhookError> {
        let signature = cmd
            .signature
            .filter(|s| !s.trim().is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let config = self
            .configs
            .find_by_provider(&self.provider)
            .await
            .map_err(|e| WebhookError::Internal(e.message))?
            .ok_or(WebhookError::NotConfigured)?;
        if !config.enabled {
            return Err(WebhookError::Disabled);
        }

        match &config.signing_secret {
            Some(secret) => {
                SignatureVerifier::new(secret.expose_secret().as_str())
                    .verify(&cmd.payload, &signature)?;
            }
            None => {
                tracing::warn!(
                    provider = %self.provider,
                    "No signing secret configured, accepting delivery on header presence"
                );
            }
        }

        let envelope = EventEnvelope::from_slice(&cmd.payload)?;
        Ok(self.apply(envelope).await)
    }

    /// Applies one parsed event. Never fails; the outcome says what happened.
    pub async fn apply(&self, envelope: EventEnvelope) -> ReconcileOutcome {
        let event_id = envelope.id.clone();
        let event_type = envelope.event_type.clone();

        let outcome = match envelope.into_event() {
            Ok(event) => self.dispatch(event).await,
            Err(e) => ReconcileOutcome::Invalid {
                reason: e.to_string(),
            },
        };

        match &outcome {
            ReconcileOutcome::SubscriptionNotFound { external_id } => tracing::warn!(
                event_id = %event_id,
                event_type = %event_type,
                external_id = %external_id,
                "No subscription for webhook event, dropping"
            ),
            ReconcileOutcome::Invalid { reason } => tracing::warn!(
                event_id = %event_id,
                event_type = %event_type,
                reason = %reason,
                "Invalid webhook payload, dropping"
            ),
            ReconcileOutcome::StoreFailed { reason } => tracing::error!(
                event_id = %event_id,
                event_type = %event_type,
                reason = %reason,
                "Store failure while reconciling webhook, dropping"
            ),
            ReconcileOutcome::Ignored { .. } => tracing::debug!(
                event_id = %event_id,
                event_type = %event_type,
                "Unhandled webhook event type"
            ),
            applied => tracing::info!(
                event_id = %event_id,
                event_type = %event_type,
                outcome = ?applied,
                "Webhook event reconciled"
            ),
        }

        outcome
    }

    async fn dispatch(&self, event: BillingEvent) -> ReconcileOutcome {
        match event {
            BillingEvent::SubscriptionCreated(payload) | BillingEvent::SubscriptionUpdated(payload) => {
                self.sync_subscription(payload).await
            }
            BillingEvent::SubscriptionDeleted(reference) => {
                self.cancel_subscription(&reference.external_id).await
            }
            BillingEvent::InvoicePaymentSucceeded(invoice) => {
                self.record_payment(invoice, |sub_id, i| {
                    PaymentRecord::succeeded(
                        sub_id,
                        i.amount_cents,
                        i.currency,
                        i.invoice_id,
                        i.paid_at.unwrap_or_default(),
                    )
                })
                .await
            }
            BillingEvent::InvoicePaymentFailed(invoice) => {
                self.record_payment(invoice, |sub_id, i| {
                    PaymentRecord::failed(sub_id, i.amount_cents, i.currency, i.invoice_id)
                })
                .await
            }
            BillingEvent::Unhandled { event_type } => ReconcileOutcome::Ignored { event_type },
        }
    }

    async fn sync_subscription(&self, payload: SubscriptionPayload) -> ReconcileOutcome {
        let mut subscription = match self.lookup(&payload.external_id).await {
            Ok(sub) => sub,
            Err(outcome) => return outcome,
        };

        if !subscription.apply_provider_state(&payload.state) {
            return ReconcileOutcome::Unchanged {
                subscription_id: subscription.id,
            };
        }
        self.save(&subscription).await
    }

    async fn cancel_subscription(&self, external_id: &str) -> ReconcileOutcome {
        let mut subscription = match self.lookup(external_id).await {
            Ok(sub) => sub,
            Err(outcome) => return outcome,
        };

        if !subscription.mark_deleted_by_provider() {
            return ReconcileOutcome::Unchanged {
                subscription_id: subscription.id,
            };
        }
        self.save(&subscription).await
    }

    async fn record_payment<F>(&self, invoice: InvoicePayload, build: F) -> ReconcileOutcome
    where
        F: FnOnce(SubscriptionId, InvoicePayload) -> PaymentRecord,
    {
        let subscription = match self.lookup(&invoice.external_subscription_id).await {
            Ok(sub) => sub,
            Err(outcome) => return outcome,
        };

        let record = build(subscription.id, invoice);
        match self.payments.append(&record).await {
            Ok(()) => ReconcileOutcome::PaymentRecorded {
                subscription_id: subscription.id,
                payment_id: record.id,
            },
            Err(e) => ReconcileOutcome::StoreFailed { reason: e.to_string() },
        }
    }

    async fn lookup(
        &self,
        external_id: &str,
    ) -> Result<Subscription, ReconcileOutcome> {
        match self.subscriptions.find_by_external_id(external_id).await {
            Ok(Some(sub)) => Ok(sub),
            Ok(None) => Err(ReconcileOutcome::SubscriptionNotFound {
                external_id: external_id.to_string(),
            }),
            Err(e) => Err(ReconcileOutcome::StoreFailed { reason: e.to_string() }),
        }
    }

    async fn save(&self, subscription: &Subscription) -> ReconcileOutcome {
        match self.subscriptions.update(subscription).await {
            Ok(()) => ReconcileOutcome::SubscriptionUpdated {
                subscription_id: subscription.id,
            },
            Err(e) => ReconcileOutcome::StoreFailed { reason: e.to_string() },
        }
    }
}
