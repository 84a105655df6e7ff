//! DeactivateStudentHandler - soft-deletes a student and releases its slot.

use std::sync::Arc;

use crate::domain::foundation::{StudentId, TrainerId};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{StudentRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct DeactivateStudentCommand {
    pub trainer_id: TrainerId,
    pub student_id: StudentId,
}

pub struct DeactivateStudentHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    students: Arc<dyn StudentRepository>,
}

impl DeactivateStudentHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            subscriptions,
            students,
        }
    }

    /// Returns whether the student was active before the call.
    ///
    /// Students owned by another trainer are reported as not found.
    pub async fn handle(&self, cmd: DeactivateStudentCommand) -> Result<bool, SubscriptionError> {
        let owned = self
            .students
            .find_by_id(&cmd.student_id)
            .await?
            .filter(|s| s.trainer_id == cmd.trainer_id);
        if owned.is_none() {
            return Err(SubscriptionError::StudentNotFound);
        }

        let changed = self.students.deactivate(&cmd.student_id).await?;
        if !changed {
            return Ok(false);
        }

        match self.subscriptions.find_current_for_trainer(&cmd.trainer_id).await {
            Ok(Some(current)) => {
                if let Err(e) = self
                    .subscriptions
                    .adjust_student_count(&current.subscription.id, -1)
                    .await
                {
                    tracing::warn!(
                        subscription_id = %current.subscription.id,
                        error = %e,
                        "Failed to decrement student counter"
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(trainer_id = %cmd.trainer_id, error = %e, "Subscription lookup failed after deactivation");
            }
        }

        tracing::info!(trainer_id = %cmd.trainer_id, student_id = %cmd.student_id, "Student deactivated");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::PlanId;
    use crate::domain::subscription::{BillingPeriod, Subscription, SubscriptionPlan};
    use crate::domain::trainer::Student;

    async fn setup(count: u32) -> (Arc<InMemoryStore>, TrainerId, Student, Subscription) {
        let store = Arc::new(InMemoryStore::new());
        let trainer_id = TrainerId::new();
        let plan = SubscriptionPlan {
            id: PlanId::new(),
            name: "Pro".to_string(),
            price_cents: 4990,
            billing_period: BillingPeriod::Monthly,
            student_limit: 10,
            features: vec![],
            is_active: true,
        };
        store.add_plan(plan.clone());
        let mut sub = Subscription::create_active(trainer_id, plan.id, 30).unwrap();
        sub.students_count = count;
        SubscriptionRepository::insert(store.as_ref(), &sub).await.unwrap();
        let student = Student::new(trainer_id, "Bruno", None, None).unwrap();
        StudentRepository::insert(store.as_ref(), &student).await.unwrap();
        (store, trainer_id, student, sub)
    }

    async fn counter(store: &InMemoryStore, sub: &Subscription) -> u32 {
        SubscriptionRepository::find_by_id(store, &sub.id)
            .await
            .unwrap()
            .unwrap()
            .students_count
    }

    #[tokio::test]
    async fn deactivation_releases_a_slot() {
        let (store, trainer_id, student, sub) = setup(1).await;
        let handler = DeactivateStudentHandler::new(store.clone(), store.clone());

        let changed = handler
            .handle(DeactivateStudentCommand {
                trainer_id,
                student_id: student.id,
            })
            .await
            .unwrap();

        assert!(changed);
        assert_eq!(counter(&store, &sub).await, 0);
        assert!(!store.students_for(&trainer_id)[0].is_active);
    }

    #[tokio::test]
    async fn second_deactivation_leaves_counter_alone() {
        let (store, trainer_id, student, sub) = setup(1).await;
        let handler = DeactivateStudentHandler::new(store.clone(), store.clone());
        let cmd = DeactivateStudentCommand {
            trainer_id,
            student_id: student.id,
        };

        handler.handle(cmd.clone()).await.unwrap();
        let changed = handler.handle(cmd).await.unwrap();

        assert!(!changed);
        assert_eq!(counter(&store, &sub).await, 0);
    }

    #[tokio::test]
    async fn other_trainers_student_is_not_found() {
        let (store, _, student, _) = setup(1).await;
        let handler = DeactivateStudentHandler::new(store.clone(), store.clone());

        let err = handler
            .handle(DeactivateStudentCommand {
                trainer_id: TrainerId::new(),
                student_id: student.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::StudentNotFound));
    }
}
