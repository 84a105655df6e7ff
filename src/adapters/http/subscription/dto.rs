//! HTTP DTOs for plan assignment and entitlement checks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::handlers::{AssignPlanResult, CheckEntitlementResult};
use crate::domain::subscription::SubscriptionStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct AssignPlanRequest {
    pub trainer_id: Uuid,
    pub plan_id: Uuid,
    /// Overrides the plan's billing period for the first period.
    #[serde(default)]
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartTrialRequest {
    pub plan_id: Uuid,
    #[serde(default)]
    pub external_subscription_id: Option<String>,
    #[serde(default)]
    pub external_customer_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementResponse {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<CheckEntitlementResult> for EntitlementResponse {
    fn from(result: CheckEntitlementResult) -> Self {
        Self {
            allowed: result.decision.is_allowed(),
            reason: result.decision.denial().map(|d| d.message()),
        }
    }
}

/// A trainer's subscription together with its plan limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub trainer_id: String,
    pub plan_id: String,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    /// ISO 8601.
    pub current_period_start: String,
    /// ISO 8601.
    pub current_period_end: String,
    pub days_remaining: i64,
    pub students_count: u32,
    pub student_limit: u32,
    /// Entitled rows the assignment canceled.
    pub superseded: u64,
}

impl From<AssignPlanResult> for SubscriptionResponse {
    fn from(result: AssignPlanResult) -> Self {
        let sub = result.subscription;
        Self {
            id: sub.id.to_string(),
            trainer_id: sub.trainer_id.to_string(),
            plan_id: sub.plan_id.to_string(),
            plan_name: result.plan.name,
            status: sub.status,
            current_period_start: sub.current_period_start.as_datetime().to_rfc3339(),
            current_period_end: sub.current_period_end.as_datetime().to_rfc3339(),
            days_remaining: sub.days_remaining(),
            students_count: sub.students_count,
            student_limit: result.plan.student_limit,
            superseded: result.superseded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::{DenialReason, EntitlementDecision};

    #[test]
    fn allowed_decision_omits_reason() {
        let response = EntitlementResponse::from(CheckEntitlementResult {
            decision: EntitlementDecision::Allowed,
            subscription_id: None,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"allowed": true}));
    }

    #[test]
    fn denied_decision_carries_message() {
        let reason = DenialReason::FreeTierLimitReached { current: 5, limit: 5 };
        let response = EntitlementResponse::from(CheckEntitlementResult {
            decision: EntitlementDecision::Denied(reason.clone()),
            subscription_id: None,
        });
        assert!(!response.allowed);
        assert_eq!(response.reason, Some(reason.message()));
    }

    #[test]
    fn trial_request_defaults_external_ids() {
        let req: StartTrialRequest =
            serde_json::from_str(r#"{"plan_id":"3f2504e0-4f89-11d3-9a0c-0305e82c3301"}"#).unwrap();
        assert!(req.external_subscription_id.is_none());
        assert!(req.external_customer_id.is_none());
    }
}
