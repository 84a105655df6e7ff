//! Subscription status and its mapping from provider statuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Lifecycle status of a trainer's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Checkout-started trial; entitled like `Active`.
    Trialing,
    Active,
    /// Renewal payment failed; the provider is retrying.
    PastDue,
    /// Superseded by a newer plan or ended by the provider.
    Canceled,
}

impl SubscriptionStatus {
    /// Statuses whose plan limits govern the trainer.
    pub const ENTITLED: [SubscriptionStatus; 2] =
        [SubscriptionStatus::Trialing, SubscriptionStatus::Active];

    /// Returns true if this status grants the plan's entitlements.
    pub fn grants_entitlement(&self) -> bool {
        Self::ENTITLED.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    /// Maps a billing-provider subscription status onto ours.
    ///
    /// The provider has more states than we track; the ones that still
    /// expect payment fold into `PastDue`, the ones that ended fold into
    /// `Canceled`.
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "trialing" => Some(SubscriptionStatus::Trialing),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" | "unpaid" | "incomplete" | "paused" => Some(SubscriptionStatus::PastDue),
            "canceled" | "incomplete_expired" => Some(SubscriptionStatus::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}
