//! CreateStudentHandler - Command handler for entitlement-gated student creation.

use std::sync::Arc;

use crate::application::handlers::subscription::{CheckEntitlementHandler, CheckEntitlementQuery};
use crate::domain::foundation::TrainerId;
use crate::domain::subscription::{Action, EntitlementDecision, SubscriptionError};
use crate::domain::trainer::Student;
use crate::ports::{StudentRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct CreateStudentCommand {
    pub trainer_id: TrainerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct CreateStudentHandler {
    entitlements: CheckEntitlementHandler,
    subscriptions: Arc<dyn SubscriptionRepository>,
    students: Arc<dyn StudentRepository>,
}

impl CreateStudentHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            entitlements: CheckEntitlementHandler::new(subscriptions.clone(), students.clone()),
            subscriptions,
            students,
        }
    }

    /// Adds a student if the trainer's plan (or the free tier) has room.
    ///
    /// The subscription counter is bumped after the insert. A failed bump is
    /// logged; the student stays created.
    pub async fn handle(&self, cmd: CreateStudentCommand) -> Result<Student, SubscriptionError> {
        let student = Student::new(
            cmd.trainer_id,
            &cmd.name,
            cmd.email.as_deref(),
            cmd.phone.as_deref(),
        )?;

        let check = self
            .entitlements
            .handle(CheckEntitlementQuery {
                trainer_id: cmd.trainer_id,
                action: Action::CreateStudent,
            })
            .await;
        if let EntitlementDecision::Denied(reason) = check.decision {
            return Err(SubscriptionError::LimitReached(reason));
        }

        self.students
            .insert(&student)
            .await
            .map_err(|e| SubscriptionError::Infrastructure(e.message))?;

        if let Some(subscription_id) = check.subscription_id {
            if let Err(e) = self.subscriptions.adjust_student_count(&subscription_id, 1).await {
                tracing::warn!(
                    subscription_id = %subscription_id,
                    error = %e,
                    "Failed to increment student counter"
                );
            }
        }

        tracing::info!(trainer_id = %cmd.trainer_id, student_id = %student.id, "Student created");
        Ok(student)
    }
}
