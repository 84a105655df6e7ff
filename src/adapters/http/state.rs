//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::{
    AssignPlanHandler, CheckEntitlementHandler, CreateStudentHandler, CreateTrainerHandler,
    DeactivateStudentHandler, ReconcileWebhookHandler, TrainerProvisioning,
};
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::trainer::Trainer;
use crate::ports::{
    IdentityProvider, PaymentHistoryRepository, PlanReader, SessionValidator, StudentRepository,
    SubscriptionRepository, TrainerRepository, WebhookConfigReader,
};

use super::error::ApiError;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub trainers: Arc<dyn TrainerRepository>,
    pub plans: Arc<dyn PlanReader>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub payments: Arc<dyn PaymentHistoryRepository>,
    pub webhook_configs: Arc<dyn WebhookConfigReader>,
    pub identity: Arc<dyn IdentityProvider>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub provisioning: TrainerProvisioning,
    /// Provider name the webhook configuration is stored under.
    pub webhook_provider: String,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn create_trainer_handler(&self) -> CreateTrainerHandler {
        CreateTrainerHandler::new(
            self.identity.clone(),
            self.trainers.clone(),
            self.provisioning.clone(),
        )
    }

    pub fn assign_plan_handler(&self) -> AssignPlanHandler {
        AssignPlanHandler::new(
            self.trainers.clone(),
            self.plans.clone(),
            self.subscriptions.clone(),
        )
    }

    pub fn check_entitlement_handler(&self) -> CheckEntitlementHandler {
        CheckEntitlementHandler::new(self.subscriptions.clone(), self.students.clone())
    }

    pub fn create_student_handler(&self) -> CreateStudentHandler {
        CreateStudentHandler::new(self.subscriptions.clone(), self.students.clone())
    }

    pub fn deactivate_student_handler(&self) -> DeactivateStudentHandler {
        DeactivateStudentHandler::new(self.subscriptions.clone(), self.students.clone())
    }

    pub fn webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.webhook_provider.clone(),
            self.webhook_configs.clone(),
            self.subscriptions.clone(),
            self.payments.clone(),
        )
    }

    /// Looks up the trainer account behind an authenticated caller.
    ///
    /// Callers without a trainer row (the super-admin, for one) get 403.
    pub async fn caller_trainer(&self, user: &AuthenticatedUser) -> Result<Trainer, ApiError> {
        self.trainers
            .find_by_identity(&user.id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| {
                tracing::debug!(identity_id = %user.id, "Caller has no active trainer account");
                ApiError::forbidden("Only personal trainers can perform this action")
            })
    }

    /// True when the caller is the configured super-admin.
    pub fn is_super_admin(&self, user: &AuthenticatedUser) -> bool {
        user.has_email(&self.provisioning.super_admin_email)
    }
}
