//! AssignPlanHandler - Command handler for plan assignment and checkout trials.
//!
//! Both flows supersede whatever the trainer currently has: entitled rows
//! are canceled first, then the new row is inserted. The two writes are not
//! atomic. A failed cancel is logged and the assignment still goes ahead.
//! The new row's student counter starts at zero.

use std::sync::Arc;

use crate::domain::foundation::{PlanId, TrainerId};
use crate::domain::subscription::{
    ExternalRefs, Subscription, SubscriptionError, SubscriptionPlan,
};
use crate::ports::{PlanReader, SubscriptionRepository, TrainerRepository};

/// Command to put a trainer on a plan.
#[derive(Debug, Clone)]
pub struct AssignPlanCommand {
    pub trainer_id: TrainerId,
    pub plan_id: PlanId,
    /// Length of the first period; defaults to the plan's billing period.
    pub duration_days: Option<i64>,
}

/// Command to start a checkout trial.
#[derive(Debug, Clone)]
pub struct StartTrialCommand {
    pub trainer_id: TrainerId,
    pub plan_id: PlanId,
    pub external: ExternalRefs,
}

#[derive(Debug, Clone)]
pub struct AssignPlanResult {
    pub subscription: Subscription,
    pub plan: SubscriptionPlan,
    /// Rows canceled by the assignment.
    pub superseded: u64,
}

pub struct AssignPlanHandler {
    trainers: Arc<dyn TrainerRepository>,
    plans: Arc<dyn PlanReader>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl AssignPlanHandler {
    pub fn new(
        trainers: Arc<dyn TrainerRepository>,
        plans: Arc<dyn PlanReader>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            trainers,
            plans,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: AssignPlanCommand) -> Result<AssignPlanResult, SubscriptionError> {
        let plan = self.load_assignable(&cmd.trainer_id, &cmd.plan_id).await?;
        let duration_days = cmd
            .duration_days
            .unwrap_or_else(|| plan.billing_period.days());

        let subscription = Subscription::create_active(cmd.trainer_id, plan.id, duration_days)?;
        self.supersede(subscription, plan).await
    }

    pub async fn start_trial(&self, cmd: StartTrialCommand) -> Result<AssignPlanResult, SubscriptionError> {
        let plan = self.load_assignable(&cmd.trainer_id, &cmd.plan_id).await?;

        let subscription = Subscription::create_trial(cmd.trainer_id, plan.id, cmd.external);
        self.supersede(subscription, plan).await
    }

    async fn load_assignable(
        &self,
        trainer_id: &TrainerId,
        plan_id: &PlanId,
    ) -> Result<SubscriptionPlan, SubscriptionError> {
        if self.trainers.find_by_id(trainer_id).await?.is_none() {
            return Err(SubscriptionError::TrainerNotFound);
        }
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or(SubscriptionError::PlanNotFound(*plan_id))?;
        if !plan.is_active {
            return Err(SubscriptionError::PlanInactive(*plan_id));
        }
        Ok(plan)
    }

    async fn supersede(
        &self,
        subscription: Subscription,
        plan: SubscriptionPlan,
    ) -> Result<AssignPlanResult, SubscriptionError> {
        let superseded = match self
            .subscriptions
            .cancel_entitled_for_trainer(&subscription.trainer_id)
            .await
        {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(
                    trainer_id = %subscription.trainer_id,
                    error = %e,
                    "Failed to cancel previous subscriptions, continuing"
                );
                0
            }
        };

        self.subscriptions
            .insert(&subscription)
            .await
            .map_err(|e| SubscriptionError::Infrastructure(e.message))?;

        tracing::info!(
            trainer_id = %subscription.trainer_id,
            subscription_id = %subscription.id,
            plan = %plan.name,
            status = %subscription.status,
            superseded,
            "Subscription assigned"
        );

        Ok(AssignPlanResult {
            subscription,
            plan,
            superseded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{DomainError, ErrorCode, IdentityId, SubscriptionId};
    use crate::domain::subscription::{BillingPeriod, SubscriptionStatus, TRIAL_DAYS};
    use crate::domain::trainer::{Student, Trainer, TrainerRegistration};
    use crate::ports::{StudentRepository, SubscriptionWithPlan};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    /// Wraps the in-memory store and fails selected writes.
    struct FlakySubscriptions {
        inner: Arc<InMemoryStore>,
        fail_cancel: bool,
        fail_insert: bool,
        inserted: Mutex<Vec<SubscriptionId>>,
    }

    #[async_trait]
    impl SubscriptionRepository for FlakySubscriptions {
        async fn insert(&self, s: &Subscription) -> Result<(), DomainError> {
            if self.fail_insert {
                return Err(DomainError::new(ErrorCode::DatabaseError, "insert failed"));
            }
            self.inserted.lock().unwrap().push(s.id);
            SubscriptionRepository::insert(self.inner.as_ref(), s).await
        }
        async fn update(&self, s: &Subscription) -> Result<(), DomainError> {
            self.inner.update(s).await
        }
        async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
            SubscriptionRepository::find_by_id(self.inner.as_ref(), id).await
        }
        async fn find_by_external_id(&self, id: &str) -> Result<Option<Subscription>, DomainError> {
            self.inner.find_by_external_id(id).await
        }
        async fn find_current_for_trainer(
            &self,
            id: &TrainerId,
        ) -> Result<Option<SubscriptionWithPlan>, DomainError> {
            self.inner.find_current_for_trainer(id).await
        }
        async fn cancel_entitled_for_trainer(&self, id: &TrainerId) -> Result<u64, DomainError> {
            if self.fail_cancel {
                return Err(DomainError::new(ErrorCode::DatabaseError, "cancel failed"));
            }
            self.inner.cancel_entitled_for_trainer(id).await
        }
        async fn adjust_student_count(&self, id: &SubscriptionId, d: i32) -> Result<(), DomainError> {
            self.inner.adjust_student_count(id, d).await
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn plan(period: BillingPeriod, active: bool) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(),
            name: "Quarterly Pro".to_string(),
            price_cents: 12990,
            billing_period: period,
            student_limit: 30,
            features: vec![],
            is_active: active,
        }
    }

    async fn seed_trainer(store: &InMemoryStore) -> TrainerId {
        let details = TrainerRegistration {
            name: Some("Coach".to_string()),
            cpf: Some("12345678900".to_string()),
            email: Some("coach@example.com".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let trainer = Trainer::register(IdentityId::new("auth-coach").unwrap(), details);
        TrainerRepository::insert(store, &trainer).await.unwrap();
        trainer.id
    }

    fn handler(store: &Arc<InMemoryStore>) -> AssignPlanHandler {
        AssignPlanHandler::new(store.clone(), store.clone(), store.clone())
    }

    fn active_rows(store: &InMemoryStore, trainer_id: &TrainerId) -> Vec<Subscription> {
        store
            .subscriptions_for(trainer_id)
            .into_iter()
            .filter(|s| s.status == SubscriptionStatus::Active)
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn assign_creates_active_subscription() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());

        let result = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: Some(45),
            })
            .await
            .unwrap();

        let sub = result.subscription;
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.students_count, 0);
        assert!(!sub.cancel_at_period_end);
        assert_eq!(
            sub.current_period_end.duration_since(&sub.current_period_start).num_days(),
            45
        );
        assert_eq!(result.superseded, 0);
    }

    #[tokio::test]
    async fn assign_defaults_duration_to_plan_period() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Quarterly, true);
        store.add_plan(plan.clone());

        let sub = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap()
            .subscription;

        assert_eq!(
            sub.current_period_end.duration_since(&sub.current_period_start).num_days(),
            90
        );
    }

    #[tokio::test]
    async fn reassign_leaves_exactly_one_active_row() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let first = plan(BillingPeriod::Monthly, true);
        let second = plan(BillingPeriod::Yearly, true);
        store.add_plan(first.clone());
        store.add_plan(second.clone());
        let handler = handler(&store);

        handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: first.id,
                duration_days: None,
            })
            .await
            .unwrap();
        let result = handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: second.id,
                duration_days: None,
            })
            .await
            .unwrap();

        let active = active_rows(&store, &trainer_id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].plan_id, second.id);
        assert_eq!(result.superseded, 1);
        assert_eq!(store.subscriptions_for(&trainer_id).len(), 2);
    }

    #[tokio::test]
    async fn assign_starts_counter_at_zero_with_existing_students() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        for name in ["Ana", "Bia", "Caio"] {
            let student = Student::new(trainer_id, name, None, None).unwrap();
            StudentRepository::insert(store.as_ref(), &student).await.unwrap();
        }
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());

        let sub = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap()
            .subscription;
        assert_eq!(sub.students_count, 0);
        let stored = SubscriptionRepository::find_by_id(store.as_ref(), &sub.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.students_count, 0);
        assert_eq!(store.students_for(&trainer_id).len(), 3);
    }

    #[tokio::test]
    async fn assign_rejects_non_positive_duration() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());

        let err = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: Some(0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::Validation(_)));
        assert!(store.subscriptions_for(&trainer_id).is_empty());
    }

    #[tokio::test]
    async fn invalid_duration_does_not_cancel_current_plan() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());
        let handler = handler(&store);
        handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap();

        let _ = handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: Some(-1),
            })
            .await;
        assert_eq!(active_rows(&store, &trainer_id).len(), 1);
    }

    #[tokio::test]
    async fn assign_rejects_unknown_plan() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let missing = PlanId::new();

        let err = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: missing,
                duration_days: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::PlanNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn assign_rejects_inactive_plan() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, false);
        store.add_plan(plan.clone());

        let err = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::PlanInactive(_)));
    }

    #[tokio::test]
    async fn assign_rejects_unknown_trainer() {
        let store = Arc::new(InMemoryStore::new());
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());

        let err = handler(&store)
            .handle(AssignPlanCommand {
                trainer_id: TrainerId::new(),
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::TrainerNotFound));
    }

    #[tokio::test]
    async fn cancel_failure_is_not_fatal() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());
        let flaky = Arc::new(FlakySubscriptions {
            inner: store.clone(),
            fail_cancel: true,
            fail_insert: false,
            inserted: Mutex::new(Vec::new()),
        });
        let handler = AssignPlanHandler::new(store.clone(), store.clone(), flaky.clone());

        let result = handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap();
        assert_eq!(result.superseded, 0);
        assert_eq!(flaky.inserted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_failure_is_fatal() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());
        let flaky = Arc::new(FlakySubscriptions {
            inner: store.clone(),
            fail_cancel: false,
            fail_insert: true,
            inserted: Mutex::new(Vec::new()),
        });
        let handler = AssignPlanHandler::new(store.clone(), store.clone(), flaky);

        let err = handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn trial_is_thirty_days_and_supersedes_active() {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = seed_trainer(&store).await;
        let plan = plan(BillingPeriod::Monthly, true);
        store.add_plan(plan.clone());
        let handler = handler(&store);
        handler
            .handle(AssignPlanCommand {
                trainer_id,
                plan_id: plan.id,
                duration_days: None,
            })
            .await
            .unwrap();

        let trial = handler
            .start_trial(StartTrialCommand {
                trainer_id,
                plan_id: plan.id,
                external: ExternalRefs {
                    subscription_id: Some("sub_trial".to_string()),
                    customer_id: Some("cus_1".to_string()),
                },
            })
            .await
            .unwrap()
            .subscription;

        assert_eq!(trial.status, SubscriptionStatus::Trialing);
        assert_eq!(
            trial.current_period_end.duration_since(&trial.current_period_start).num_days(),
            TRIAL_DAYS
        );
        assert!(active_rows(&store, &trainer_id).is_empty());
        let current = store.find_current_for_trainer(&trainer_id).await.unwrap().unwrap();
        assert_eq!(current.subscription.id, trial.id);
    }
}
