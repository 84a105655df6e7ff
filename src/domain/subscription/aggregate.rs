//! Subscription aggregate.
//!
//! A subscription ties one trainer to one plan for a billing period. Rows
//! are never deleted: a plan change cancels the previous row and inserts a
//! new one, and provider events overwrite status and period in place.
//!
//! Student counts are denormalized onto the row so the entitlement check
//! is a single read. Every new row starts its counter at zero.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    PlanId, SubscriptionId, Timestamp, TrainerId, ValidationError,
};

use super::SubscriptionStatus;

/// Fixed length of a checkout trial.
pub const TRIAL_DAYS: i64 = 30;

/// Upper bound accepted for an explicit assignment duration.
pub const MAX_DURATION_DAYS: i64 = 3650;

/// Identifiers the billing provider uses for this subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRefs {
    pub subscription_id: Option<String>,
    pub customer_id: Option<String>,
}

/// Provider-reported fields a subscription event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderState {
    pub status: SubscriptionStatus,
    pub current_period_start: Timestamp,
    pub current_period_end: Timestamp,
    pub cancel_at_period_end: bool,
    /// Provider customer id; `None` keeps the one already stored.
    pub customer_id: Option<String>,
}

/// A trainer's subscription to a plan.
///
/// # Invariants
///
/// - `current_period_start <= current_period_end`
/// - at most one row per trainer is `Active` (maintained by plan assignment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub trainer_id: TrainerId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub current_period_start: Timestamp,
    pub current_period_end: Timestamp,
    /// Active students counted against the plan limit.
    pub students_count: u32,
    pub cancel_at_period_end: bool,
    pub external: ExternalRefs,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Creates an active subscription running `duration_days` from now.
    pub fn create_active(
        trainer_id: TrainerId,
        plan_id: PlanId,
        duration_days: i64,
    ) -> Result<Self, ValidationError> {
        Self::start(
            trainer_id,
            plan_id,
            SubscriptionStatus::Active,
            duration_days,
            ExternalRefs::default(),
        )
    }

    /// Creates a 30-day trial started from checkout.
    pub fn create_trial(
        trainer_id: TrainerId,
        plan_id: PlanId,
        external: ExternalRefs,
    ) -> Self {
        let now = Timestamp::now();
        Self::build(
            trainer_id,
            plan_id,
            SubscriptionStatus::Trialing,
            now,
            now.add_days(TRIAL_DAYS),
            external,
        )
    }

    fn start(
        trainer_id: TrainerId,
        plan_id: PlanId,
        status: SubscriptionStatus,
        duration_days: i64,
        external: ExternalRefs,
    ) -> Result<Self, ValidationError> {
        if !(1..=MAX_DURATION_DAYS).contains(&duration_days) {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                MAX_DURATION_DAYS,
                duration_days,
            ));
        }
        let now = Timestamp::now();
        Ok(Self::build(
            trainer_id,
            plan_id,
            status,
            now,
            now.add_days(duration_days),
            external,
        ))
    }

    fn build(
        trainer_id: TrainerId,
        plan_id: PlanId,
        status: SubscriptionStatus,
        period_start: Timestamp,
        period_end: Timestamp,
        external: ExternalRefs,
    ) -> Self {
        Self {
            id: SubscriptionId::new(),
            trainer_id,
            plan_id,
            status,
            current_period_start: period_start,
            current_period_end: period_end,
            students_count: 0,
            cancel_at_period_end: false,
            external,
            created_at: period_start,
            updated_at: period_start,
        }
    }

    /// Returns true if this row's plan governs the trainer's limits.
    pub fn is_entitled(&self) -> bool {
        self.status.grants_entitlement()
    }

    /// Overwrites status and period with what the provider reports.
    ///
    /// The provider is authoritative, so no transition check applies.
    /// Returns false and leaves `updated_at` alone when nothing differs,
    /// which keeps replays of the same event from touching the row.
    pub fn apply_provider_state(&mut self, state: &ProviderState) -> bool {
        let unchanged = self.status == state.status
            && self.current_period_start == state.current_period_start
            && self.current_period_end == state.current_period_end
            && self.cancel_at_period_end == state.cancel_at_period_end
            && state
                .customer_id
                .as_ref()
                .map_or(true, |c| self.external.customer_id.as_ref() == Some(c));
        if unchanged {
            return false;
        }
        self.status = state.status;
        self.current_period_start = state.current_period_start;
        self.current_period_end = state.current_period_end;
        self.cancel_at_period_end = state.cancel_at_period_end;
        if let Some(customer_id) = &state.customer_id {
            self.external.customer_id = Some(customer_id.clone());
        }
        self.updated_at = Timestamp::now();
        true
    }

    /// Marks the subscription canceled because the provider deleted it.
    ///
    /// Returns false if it was already canceled.
    pub fn mark_deleted_by_provider(&mut self) -> bool {
        if self.status == SubscriptionStatus::Canceled {
            return false;
        }
        self.status = SubscriptionStatus::Canceled;
        self.updated_at = Timestamp::now();
        true
    }

    /// Days left in the current period, 0 once it has ended.
    pub fn days_remaining(&self) -> i64 {
        self.current_period_end
            .duration_since(&Timestamp::now())
            .num_days()
            .max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> Subscription {
        Subscription::create_active(TrainerId::new(), PlanId::new(), 30).unwrap()
    }

    fn provider_state(sub: &Subscription) -> ProviderState {
        ProviderState {
            status: sub.status,
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
            cancel_at_period_end: sub.cancel_at_period_end,
            customer_id: None,
        }
    }

    #[test]
    fn create_active_spans_duration() {
        let sub = Subscription::create_active(TrainerId::new(), PlanId::new(), 90).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(
            sub.current_period_end
                .duration_since(&sub.current_period_start)
                .num_days(),
            90
        );
        assert_eq!(sub.students_count, 0);
        assert!(!sub.cancel_at_period_end);
    }

    #[test]
    fn create_active_rejects_zero_duration() {
        let err = Subscription::create_active(TrainerId::new(), PlanId::new(), 0).unwrap_err();
        assert_eq!(err.field(), "duration_days");
    }

    #[test]
    fn create_active_rejects_negative_duration() {
        assert!(Subscription::create_active(TrainerId::new(), PlanId::new(), -5).is_err());
    }

    #[test]
    fn create_trial_is_thirty_days_trialing() {
        let refs = ExternalRefs {
            subscription_id: Some("sub_123".to_string()),
            customer_id: Some("cus_123".to_string()),
        };
        let sub = Subscription::create_trial(TrainerId::new(), PlanId::new(), refs.clone());
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        assert_eq!(sub.students_count, 0);
        assert!(sub.is_entitled());
        assert_eq!(sub.external, refs);
        assert_eq!(
            sub.current_period_end
                .duration_since(&sub.current_period_start)
                .num_days(),
            TRIAL_DAYS
        );
    }

    #[test]
    fn apply_provider_state_overwrites_fields() {
        let mut sub = active();
        let start = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let state = ProviderState {
            status: SubscriptionStatus::PastDue,
            current_period_start: start,
            current_period_end: start.add_days(30),
            cancel_at_period_end: true,
            customer_id: None,
        };
        assert!(sub.apply_provider_state(&state));
        assert_eq!(sub.status, SubscriptionStatus::PastDue);
        assert_eq!(sub.current_period_start, start);
        assert!(sub.cancel_at_period_end);
    }

    #[test]
    fn apply_provider_state_is_idempotent() {
        let mut sub = active();
        let start = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        let state = ProviderState {
            status: SubscriptionStatus::Active,
            current_period_start: start,
            current_period_end: start.add_days(30),
            cancel_at_period_end: false,
            customer_id: Some("cus_1".to_string()),
        };
        sub.apply_provider_state(&state);
        let after_first = sub.clone();
        assert!(!sub.apply_provider_state(&state));
        assert_eq!(sub, after_first);
    }

    #[test]
    fn apply_identical_state_does_not_touch_updated_at() {
        let mut sub = active();
        let before = sub.updated_at;
        let state = provider_state(&sub);
        assert!(!sub.apply_provider_state(&state));
        assert_eq!(sub.updated_at, before);
    }

    #[test]
    fn apply_provider_state_records_customer_id() {
        let mut sub = active();
        let mut state = provider_state(&sub);
        state.customer_id = Some("cus_42".to_string());
        assert!(sub.apply_provider_state(&state));
        assert_eq!(sub.external.customer_id.as_deref(), Some("cus_42"));

        state.customer_id = None;
        assert!(!sub.apply_provider_state(&state));
        assert_eq!(sub.external.customer_id.as_deref(), Some("cus_42"));
    }

    #[test]
    fn provider_can_revive_canceled_row() {
        let mut sub = active();
        assert!(sub.mark_deleted_by_provider());
        let mut state = provider_state(&sub);
        state.status = SubscriptionStatus::Active;
        assert!(sub.apply_provider_state(&state));
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn mark_deleted_is_idempotent() {
        let mut sub = active();
        assert!(sub.mark_deleted_by_provider());
        assert!(!sub.mark_deleted_by_provider());
        assert_eq!(sub.status, SubscriptionStatus::Canceled);
    }

    #[test]
    fn days_remaining_counts_down() {
        let sub = active();
        assert!((29..=30).contains(&sub.days_remaining()));
    }
}
