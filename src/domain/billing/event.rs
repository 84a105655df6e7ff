//! Billing-provider webhook events.
//!
//! Deliveries arrive as an envelope `{id, type, created, data: {object}}`.
//! The envelope is parsed first; its `data.object` is then validated
//! against the schema of the event kind named by `type`. Kinds we do not
//! act on become [`BillingEvent::Unhandled`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{ProviderState, SubscriptionStatus};

use super::{PayloadError, WebhookError};

/// Outer shape shared by every delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventEnvelope {
    /// Provider event id (`evt_...`).
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix seconds at which the provider created the event.
    #[serde(default)]
    pub created: Option<i64>,

    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl EventEnvelope {
    /// Parses a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// Validates the payload for this event's kind.
    pub fn into_event(self) -> Result<BillingEvent, PayloadError> {
        let kind = EventKind::from_type(&self.event_type);
        let event_type = self.event_type;
        let object = self.data.object;
        let invalid = |reason: String| PayloadError::new(event_type.as_str(), reason);

        let event = match kind {
            EventKind::SubscriptionCreated => {
                BillingEvent::SubscriptionCreated(parse_subscription(object).map_err(invalid)?)
            }
            EventKind::SubscriptionUpdated => {
                BillingEvent::SubscriptionUpdated(parse_subscription(object).map_err(invalid)?)
            }
            EventKind::SubscriptionDeleted => {
                BillingEvent::SubscriptionDeleted(parse_subscription_ref(object).map_err(invalid)?)
            }
            EventKind::InvoicePaymentSucceeded => BillingEvent::InvoicePaymentSucceeded(
                parse_invoice(object, InvoiceOutcome::Succeeded).map_err(invalid)?,
            ),
            EventKind::InvoicePaymentFailed => BillingEvent::InvoicePaymentFailed(
                parse_invoice(object, InvoiceOutcome::Failed).map_err(invalid)?,
            ),
            EventKind::Unhandled => BillingEvent::Unhandled {
                event_type: event_type.clone(),
            },
        };
        Ok(event)
    }
}

/// Event kinds we act on, keyed by provider type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    Unhandled,
}

impl EventKind {
    /// Accepts both `customer.subscription.*` and bare `subscription.*`.
    pub fn from_type(event_type: &str) -> Self {
        let subscription_event = event_type
            .strip_prefix("customer.")
            .unwrap_or(event_type);
        match subscription_event {
            "subscription.created" => return EventKind::SubscriptionCreated,
            "subscription.updated" => return EventKind::SubscriptionUpdated,
            "subscription.deleted" => return EventKind::SubscriptionDeleted,
            _ => {}
        }
        match event_type {
            "invoice.payment_succeeded" => EventKind::InvoicePaymentSucceeded,
            "invoice.payment_failed" => EventKind::InvoicePaymentFailed,
            _ => EventKind::Unhandled,
        }
    }
}

/// A validated billing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    SubscriptionCreated(SubscriptionPayload),
    SubscriptionUpdated(SubscriptionPayload),
    SubscriptionDeleted(SubscriptionRef),
    InvoicePaymentSucceeded(InvoicePayload),
    InvoicePaymentFailed(InvoicePayload),
    /// Acknowledged without any state change.
    Unhandled { event_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPayload {
    pub external_id: String,
    pub state: ProviderState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRef {
    pub external_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayload {
    pub invoice_id: Option<String>,
    pub external_subscription_id: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Present for succeeded invoices.
    pub paid_at: Option<Timestamp>,
}

// ════════════════════════════════════════════════════════════════
// Raw provider objects
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RawSubscription {
    id: String,
    status: String,
    current_period_start: i64,
    current_period_end: i64,
    #[serde(default)]
    cancel_at_period_end: bool,
    #[serde(default)]
    customer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSubscriptionRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawInvoice {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    amount_paid: i64,
    #[serde(default)]
    amount_due: i64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    status_transitions: Option<RawStatusTransitions>,
}

#[derive(Debug, Deserialize)]
struct RawStatusTransitions {
    #[serde(default)]
    paid_at: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
enum InvoiceOutcome {
    Succeeded,
    Failed,
}

const DEFAULT_CURRENCY: &str = "brl";

fn parse_subscription(object: serde_json::Value) -> Result<SubscriptionPayload, String> {
    let raw: RawSubscription = serde_json::from_value(object).map_err(|e| e.to_string())?;
    let external_id = non_blank(raw.id, "id")?;
    let status = SubscriptionStatus::from_provider(&raw.status)
        .ok_or_else(|| format!("unknown subscription status '{}'", raw.status))?;
    let start = unix_secs(raw.current_period_start, "current_period_start")?;
    let end = unix_secs(raw.current_period_end, "current_period_end")?;
    if end.is_before(&start) {
        return Err("current_period_end precedes current_period_start".to_string());
    }

    Ok(SubscriptionPayload {
        external_id,
        state: ProviderState {
            status,
            current_period_start: start,
            current_period_end: end,
            cancel_at_period_end: raw.cancel_at_period_end,
            customer_id: raw.customer.filter(|c| !c.trim().is_empty()),
        },
    })
}

fn parse_subscription_ref(object: serde_json::Value) -> Result<SubscriptionRef, String> {
    let raw: RawSubscriptionRef = serde_json::from_value(object).map_err(|e| e.to_string())?;
    Ok(SubscriptionRef {
        external_id: non_blank(raw.id, "id")?,
    })
}

fn parse_invoice(object: serde_json::Value, outcome: InvoiceOutcome) -> Result<InvoicePayload, String> {
    let raw: RawInvoice = serde_json::from_value(object).map_err(|e| e.to_string())?;
    let external_subscription_id = raw
        .subscription
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "invoice is not linked to a subscription".to_string())?;
    let currency = raw
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let (amount_cents, paid_at) = match outcome {
        InvoiceOutcome::Succeeded => {
            let paid_secs = raw
                .status_transitions
                .and_then(|t| t.paid_at)
                .or(raw.created);
            let paid_at = match paid_secs {
                Some(secs) => unix_secs(secs, "paid_at")?,
                None => Timestamp::now(),
            };
            (raw.amount_paid, Some(paid_at))
        }
        InvoiceOutcome::Failed => (raw.amount_due, None),
    };
    if amount_cents < 0 {
        return Err(format!("negative amount {}", amount_cents));
    }

    Ok(InvoicePayload {
        invoice_id: raw.id,
        external_subscription_id,
        amount_cents,
        currency,
        paid_at,
    })
}

fn non_blank(value: String, field: &str) -> Result<String, String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        Err(format!("{} is empty", field))
    } else {
        Ok(value)
    }
}

fn unix_secs(secs: i64, field: &str) -> Result<Timestamp, String> {
    Timestamp::from_unix_secs(secs).ok_or_else(|| format!("{} out of range", field))
}
