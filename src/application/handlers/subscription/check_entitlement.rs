//! CheckEntitlementHandler - Query handler deciding whether a trainer may act.
//!
//! Reads are fail-closed: if subscription state cannot be loaded the
//! action is denied.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, TrainerId};
use crate::domain::subscription::{
    evaluate, Action, DenialReason, EntitlementBasis, EntitlementDecision,
};
use crate::ports::{StudentRepository, SubscriptionRepository};

/// Query to check a single action.
#[derive(Debug, Clone)]
pub struct CheckEntitlementQuery {
    pub trainer_id: TrainerId,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEntitlementResult {
    pub decision: EntitlementDecision,
    /// The subscription whose limits applied, if any.
    pub subscription_id: Option<SubscriptionId>,
}

impl CheckEntitlementResult {
    fn allowed() -> Self {
        Self {
            decision: EntitlementDecision::Allowed,
            subscription_id: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            decision: EntitlementDecision::Denied(DenialReason::Unavailable),
            subscription_id: None,
        }
    }
}

pub struct CheckEntitlementHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    students: Arc<dyn StudentRepository>,
}

impl CheckEntitlementHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            subscriptions,
            students,
        }
    }

    /// Returns only whether the action is allowed.
    pub async fn can_perform(&self, trainer_id: &TrainerId, action: Action) -> bool {
        self.handle(CheckEntitlementQuery {
            trainer_id: *trainer_id,
            action,
        })
        .await
        .decision
        .is_allowed()
    }

    pub async fn handle(&self, query: CheckEntitlementQuery) -> CheckEntitlementResult {
        if !query.action.is_limited() {
            return CheckEntitlementResult::allowed();
        }

        let current = match self
            .subscriptions
            .find_current_for_trainer(&query.trainer_id)
            .await
        {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(
                    trainer_id = %query.trainer_id,
                    action = %query.action,
                    error = %e,
                    "Subscription lookup failed, denying"
                );
                return CheckEntitlementResult::unavailable();
            }
        };

        let (basis, subscription_id) = match current {
            Some(row) => (
                EntitlementBasis::Plan {
                    plan_name: row.plan.name,
                    students_count: row.subscription.students_count,
                    student_limit: row.plan.student_limit,
                },
                Some(row.subscription.id),
            ),
            None => match self.students.count_active(&query.trainer_id).await {
                Ok(active_students) => (EntitlementBasis::FreeTier { active_students }, None),
                Err(e) => {
                    tracing::warn!(
                        trainer_id = %query.trainer_id,
                        error = %e,
                        "Student count failed, denying"
                    );
                    return CheckEntitlementResult::unavailable();
                }
            },
        };

        let decision = evaluate(query.action, &basis);
        if let EntitlementDecision::Denied(reason) = &decision {
            tracing::info!(
                trainer_id = %query.trainer_id,
                action = %query.action,
                ?reason,
                "Entitlement denied"
            );
        }

        CheckEntitlementResult {
            decision,
            subscription_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
    use crate::domain::subscription::{
        BillingPeriod, Subscription, SubscriptionPlan, FREE_TIER_STUDENT_LIMIT,
    };
    use crate::domain::trainer::Student;
    use crate::ports::SubscriptionWithPlan;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Subscription store whose reads always fail.
    struct FailingSubscriptions {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubscriptionRepository for FailingSubscriptions {
        async fn insert(&self, _: &Subscription) -> Result<(), DomainError> {
            unimplemented!()
        }
        async fn update(&self, _: &Subscription) -> Result<(), DomainError> {
            unimplemented!()
        }
        async fn find_by_id(&self, _: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
            unimplemented!()
        }
        async fn find_by_external_id(&self, _: &str) -> Result<Option<Subscription>, DomainError> {
            unimplemented!()
        }
        async fn find_current_for_trainer(
            &self,
            _: &TrainerId,
        ) -> Result<Option<SubscriptionWithPlan>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::new(ErrorCode::DatabaseError, "connection refused"))
        }
        async fn cancel_entitled_for_trainer(&self, _: &TrainerId) -> Result<u64, DomainError> {
            unimplemented!()
        }
        async fn adjust_student_count(&self, _: &SubscriptionId, _: i32) -> Result<(), DomainError> {
            unimplemented!()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn plan(limit: u32) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(),
            name: "Pro".to_string(),
            price_cents: 4990,
            billing_period: BillingPeriod::Monthly,
            student_limit: limit,
            features: vec![],
            is_active: true,
        }
    }

    fn handler(store: &Arc<InMemoryStore>) -> CheckEntitlementHandler {
        CheckEntitlementHandler::new(store.clone(), store.clone())
    }

    async fn add_students(store: &InMemoryStore, trainer_id: TrainerId, n: u32) {
        for i in 0..n {
            let student = Student::new(trainer_id, &format!("Student {}", i), None, None).unwrap();
            StudentRepository::insert(store, &student).await.unwrap();
        }
    }

    async fn subscribe(store: &InMemoryStore, trainer_id: TrainerId, limit: u32, count: u32) -> Subscription {
        let plan = plan(limit);
        store.add_plan(plan.clone());
        let mut sub = Subscription::create_active(trainer_id, plan.id, 30).unwrap();
        sub.students_count = count;
        SubscriptionRepository::insert(store, &sub).await.unwrap();
        sub
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn plan_with_room_allows_student() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        let sub = subscribe(&store, trainer_id, 10, 9).await;

        let result = handler(&store)
            .handle(CheckEntitlementQuery {
                trainer_id,
                action: Action::CreateStudent,
            })
            .await;

        assert!(result.decision.is_allowed());
        assert_eq!(result.subscription_id, Some(sub.id));
    }

    #[tokio::test]
    async fn plan_at_limit_denies_student() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        subscribe(&store, trainer_id, 10, 10).await;

        assert!(!handler(&store).can_perform(&trainer_id, Action::CreateStudent).await);
    }

    #[tokio::test]
    async fn plan_counter_wins_over_roster_size() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        subscribe(&store, trainer_id, 20, 3).await;
        add_students(&store, trainer_id, FREE_TIER_STUDENT_LIMIT).await;

        assert!(handler(&store).can_perform(&trainer_id, Action::CreateStudent).await);
    }

    #[tokio::test]
    async fn trial_subscription_grants_plan_limit() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        let plan = plan(15);
        store.add_plan(plan.clone());
        let mut trial = Subscription::create_trial(trainer_id, plan.id, Default::default());
        trial.students_count = 7;
        SubscriptionRepository::insert(store.as_ref(), &trial).await.unwrap();

        let result = handler(&store)
            .handle(CheckEntitlementQuery {
                trainer_id,
                action: Action::CreateStudent,
            })
            .await;
        assert!(result.decision.is_allowed());
        assert_eq!(result.subscription_id, Some(trial.id));
    }

    #[tokio::test]
    async fn free_tier_allows_under_five() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        add_students(&store, trainer_id, 4).await;

        assert!(handler(&store).can_perform(&trainer_id, Action::CreateStudent).await);
    }

    #[tokio::test]
    async fn free_tier_denies_at_five() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        add_students(&store, trainer_id, 5).await;

        let result = handler(&store)
            .handle(CheckEntitlementQuery {
                trainer_id,
                action: Action::CreateStudent,
            })
            .await;
        assert_eq!(
            result.decision,
            EntitlementDecision::Denied(DenialReason::FreeTierLimitReached {
                current: 5,
                limit: 5
            })
        );
    }

    #[tokio::test]
    async fn canceled_subscription_falls_back_to_free_tier() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        subscribe(&store, trainer_id, 50, 0).await;
        store.cancel_entitled_for_trainer(&trainer_id).await.unwrap();
        add_students(&store, trainer_id, 5).await;

        assert!(!handler(&store).can_perform(&trainer_id, Action::CreateStudent).await);
    }

    #[tokio::test]
    async fn other_actions_skip_the_store() {
        let failing = Arc::new(FailingSubscriptions {
            calls: AtomicUsize::new(0),
        });
        let handler = CheckEntitlementHandler::new(failing.clone(), Arc::new(InMemoryStore::new()));
        let trainer_id = TrainerId::new();

        for action in [Action::CreateWorkout, Action::CreateDiet, Action::Other] {
            assert!(handler.can_perform(&trainer_id, action).await);
        }
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failure_denies() {
        let failing = Arc::new(FailingSubscriptions {
            calls: AtomicUsize::new(0),
        });
        let handler = CheckEntitlementHandler::new(failing, Arc::new(InMemoryStore::new()));

        let result = handler
            .handle(CheckEntitlementQuery {
                trainer_id: TrainerId::new(),
                action: Action::CreateStudent,
            })
            .await;
        assert_eq!(
            result.decision,
            EntitlementDecision::Denied(DenialReason::Unavailable)
        );
    }
}
