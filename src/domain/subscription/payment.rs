//! Payment history entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PaymentId, SubscriptionId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attempt to charge a subscription. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub subscription_id: SubscriptionId,
    pub status: PaymentStatus,
    pub amount_cents: i64,
    /// ISO 4217 code, lowercase as the provider sends it.
    pub currency: String,
    pub external_invoice_id: Option<String>,
    /// Set only for succeeded payments.
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl PaymentRecord {
    pub fn succeeded(
        subscription_id: SubscriptionId,
        amount_cents: i64,
        currency: impl Into<String>,
        external_invoice_id: Option<String>,
        paid_at: Timestamp,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            subscription_id,
            status: PaymentStatus::Succeeded,
            amount_cents,
            currency: currency.into(),
            external_invoice_id,
            paid_at: Some(paid_at),
            created_at: Timestamp::now(),
        }
    }

    pub fn failed(
        subscription_id: SubscriptionId,
        amount_cents: i64,
        currency: impl Into<String>,
        external_invoice_id: Option<String>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            subscription_id,
            status: PaymentStatus::Failed,
            amount_cents,
            currency: currency.into(),
            external_invoice_id,
            paid_at: None,
            created_at: Timestamp::now(),
        }
    }
}
