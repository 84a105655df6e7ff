//! Single-process store with the same constraints as the relational schema.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{
    DomainError, ErrorCode, IdentityId, PlanId, StudentId, SubscriptionId, Timestamp, TrainerId,
};
use crate::domain::subscription::{PaymentRecord, Subscription, SubscriptionPlan, SubscriptionStatus};
use crate::domain::trainer::{Cpf, Student, Trainer};
use crate::ports::{
    PaymentHistoryRepository, PlanReader, StudentRepository, SubscriptionRepository,
    SubscriptionWithPlan, TrainerRepository, WebhookConfig, WebhookConfigReader,
};

#[derive(Default)]
struct Tables {
    trainers: Vec<Trainer>,
    plans: HashMap<PlanId, SubscriptionPlan>,
    subscriptions: Vec<Subscription>,
    students: Vec<Student>,
    payments: Vec<PaymentRecord>,
    webhook_configs: HashMap<String, WebhookConfig>,
}

/// Store ports backed by a mutex-guarded set of tables.
///
/// Rows keep insertion order, so "most recent" ties resolve to the row
/// inserted last.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Seeding ===

    /// Adds or replaces a catalog plan.
    pub fn add_plan(&self, plan: SubscriptionPlan) {
        self.tables().plans.insert(plan.id, plan);
    }

    /// Adds or replaces a webhook integration.
    pub fn add_webhook_config(&self, config: WebhookConfig) {
        self.tables()
            .webhook_configs
            .insert(config.provider.clone(), config);
    }

    // === Inspection ===

    pub fn trainers(&self) -> Vec<Trainer> {
        self.tables().trainers.clone()
    }

    pub fn subscriptions_for(&self, trainer_id: &TrainerId) -> Vec<Subscription> {
        self.tables()
            .subscriptions
            .iter()
            .filter(|s| &s.trainer_id == trainer_id)
            .cloned()
            .collect()
    }

    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.tables().payments.clone()
    }

    pub fn students_for(&self, trainer_id: &TrainerId) -> Vec<Student> {
        self.tables()
            .students
            .iter()
            .filter(|s| &s.trainer_id == trainer_id)
            .cloned()
            .collect()
    }
}

fn conflict(code: ErrorCode, constraint: &str) -> DomainError {
    DomainError::new(
        code,
        format!("duplicate key value violates unique constraint \"{}\"", constraint),
    )
}

#[async_trait]
impl TrainerRepository for InMemoryStore {
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError> {
        let mut tables = self.tables();
        if tables.trainers.iter().any(|t| t.cpf == trainer.cpf) {
            return Err(conflict(ErrorCode::DuplicateCpf, "personal_trainers_cpf_key"));
        }
        if tables
            .trainers
            .iter()
            .any(|t| t.email.eq_ignore_ascii_case(&trainer.email))
        {
            return Err(conflict(ErrorCode::DuplicateEmail, "personal_trainers_email_key"));
        }
        tables.trainers.push(trainer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        Ok(self.tables().trainers.iter().find(|t| &t.id == id).cloned())
    }

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Trainer>, DomainError> {
        Ok(self.tables().trainers.iter().find(|t| &t.cpf == cpf).cloned())
    }

    async fn find_by_identity(&self, identity: &IdentityId) -> Result<Option<Trainer>, DomainError> {
        Ok(self
            .tables()
            .trainers
            .iter()
            .find(|t| &t.identity_id == identity)
            .cloned())
    }
}

#[async_trait]
impl PlanReader for InMemoryStore {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.tables().plans.get(id).cloned())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.tables().subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut tables = self.tables();
        let row = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
            })?;
        *row = subscription.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .find(|s| &s.id == id)
            .cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .filter(|s| s.external.subscription_id.as_deref() == Some(external_id))
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_current_for_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Option<SubscriptionWithPlan>, DomainError> {
        let tables = self.tables();
        let current = tables
            .subscriptions
            .iter()
            .filter(|s| &s.trainer_id == trainer_id && s.is_entitled())
            .filter_map(|s| {
                tables.plans.get(&s.plan_id).map(|plan| SubscriptionWithPlan {
                    subscription: s.clone(),
                    plan: plan.clone(),
                })
            })
            .max_by_key(|row| row.subscription.created_at);
        Ok(current)
    }

    async fn cancel_entitled_for_trainer(&self, trainer_id: &TrainerId) -> Result<u64, DomainError> {
        let now = Timestamp::now();
        let mut changed = 0;
        for sub in self
            .tables()
            .subscriptions
            .iter_mut()
            .filter(|s| &s.trainer_id == trainer_id && s.is_entitled())
        {
            sub.status = SubscriptionStatus::Canceled;
            sub.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn adjust_student_count(&self, id: &SubscriptionId, delta: i32) -> Result<(), DomainError> {
        let mut tables = self.tables();
        let sub = tables
            .subscriptions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
            })?;
        sub.students_count = sub.students_count.saturating_add_signed(delta);
        sub.updated_at = Timestamp::now();
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn insert(&self, student: &Student) -> Result<(), DomainError> {
        self.tables().students.push(student.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError> {
        Ok(self.tables().students.iter().find(|s| &s.id == id).cloned())
    }

    async fn deactivate(&self, id: &StudentId) -> Result<bool, DomainError> {
        let mut tables = self.tables();
        let student = tables
            .students
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::StudentNotFound, "Student not found"))?;
        Ok(student.deactivate())
    }

    async fn count_active(&self, trainer_id: &TrainerId) -> Result<u32, DomainError> {
        let count = self
            .tables()
            .students
            .iter()
            .filter(|s| &s.trainer_id == trainer_id && s.is_active)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl PaymentHistoryRepository for InMemoryStore {
    async fn append(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        self.tables().payments.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl WebhookConfigReader for InMemoryStore {
    async fn find_by_provider(&self, provider: &str) -> Result<Option<WebhookConfig>, DomainError> {
        Ok(self.tables().webhook_configs.get(provider).cloned())
    }
}
