//! Subscription plan catalog entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{PlanId, ValidationError};

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Trial,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingPeriod {
    /// Length of one period in days.
    ///
    /// | Period | Days |
    /// |--------|------|
    /// | Trial | 30 |
    /// | Monthly | 30 |
    /// | Quarterly | 90 |
    /// | Yearly | 365 |
    pub fn days(&self) -> i64 {
        match self {
            BillingPeriod::Trial | BillingPeriod::Monthly => 30,
            BillingPeriod::Quarterly => 90,
            BillingPeriod::Yearly => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Trial => "trial",
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Quarterly => "quarterly",
            BillingPeriod::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(BillingPeriod::Trial),
            "monthly" => Ok(BillingPeriod::Monthly),
            "quarterly" => Ok(BillingPeriod::Quarterly),
            "yearly" => Ok(BillingPeriod::Yearly),
            other => Err(ValidationError::invalid_format(
                "billing_period",
                format!("unknown period '{}'", other),
            )),
        }
    }
}

/// Immutable catalog entry a subscription points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub name: String,
    /// Price per period in cents.
    pub price_cents: i64,
    pub billing_period: BillingPeriod,
    /// Maximum number of active students.
    pub student_limit: u32,
    pub features: Vec<String>,
    /// Inactive plans stay readable for existing subscriptions but cannot be assigned.
    pub is_active: bool,
}

impl SubscriptionPlan {
    /// True while `students_count` leaves room for one more student.
    pub fn has_room_for_student(&self, students_count: u32) -> bool {
        students_count < self.student_limit
    }
}
