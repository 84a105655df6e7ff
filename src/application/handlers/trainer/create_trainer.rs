//! CreateTrainerHandler - Command handler for trainer provisioning.
//!
//! Provisioning spans two systems: an account on the identity provider and
//! a trainer row in our store. The account is created first. If the row
//! cannot be written the account is deleted again, so a failed attempt
//! leaves nothing behind and can simply be retried.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, ErrorCode, IdentityId};
use crate::domain::trainer::{NewTrainer, Trainer, TrainerError, TrainerRegistration};
use crate::ports::{IdentityProvider, NewIdentity, TrainerRepository};

/// Who may provision trainers and what password new accounts start with.
#[derive(Debug, Clone)]
pub struct TrainerProvisioning {
    pub super_admin_email: String,
    pub temporary_password: SecretString,
}

/// Command to provision a trainer account.
#[derive(Debug, Clone)]
pub struct CreateTrainerCommand {
    pub caller: AuthenticatedUser,
    pub registration: TrainerRegistration,
}

/// Result of successful provisioning.
#[derive(Debug, Clone)]
pub struct CreateTrainerResult {
    pub trainer: Trainer,
    /// Shared temporary password the trainer signs in with first.
    pub temporary_password: SecretString,
}

pub struct CreateTrainerHandler {
    identity: Arc<dyn IdentityProvider>,
    trainers: Arc<dyn TrainerRepository>,
    provisioning: TrainerProvisioning,
}

impl CreateTrainerHandler {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        trainers: Arc<dyn TrainerRepository>,
        provisioning: TrainerProvisioning,
    ) -> Self {
        Self {
            identity,
            trainers,
            provisioning,
        }
    }

    pub async fn handle(&self, cmd: CreateTrainerCommand) -> Result<CreateTrainerResult, TrainerError> {
        if !cmd.caller.has_email(&self.provisioning.super_admin_email) {
            tracing::warn!(caller = %cmd.caller.id, "Non-admin attempted to create a trainer");
            return Err(TrainerError::Forbidden);
        }

        let details = cmd.registration.validate()?;

        // Checked up front so a duplicate never reaches the identity provider.
        if self.trainers.find_by_cpf(&details.cpf).await?.is_some() {
            return Err(TrainerError::DuplicateCpf);
        }

        let identity_id = self
            .identity
            .create_user(&self.new_identity(&details))
            .await
            .map_err(|e| TrainerError::IdentityProvider(e.message))?;

        let trainer = Trainer::register(identity_id, details);
        if let Err(e) = self.trainers.insert(&trainer).await {
            self.remove_identity(&trainer.identity_id).await;
            return Err(match e.code {
                ErrorCode::DuplicateCpf => TrainerError::DuplicateCpf,
                _ => TrainerError::Infrastructure(e.message),
            });
        }

        tracing::info!(
            trainer_id = %trainer.id,
            identity_id = %trainer.identity_id,
            "Personal trainer created"
        );

        Ok(CreateTrainerResult {
            trainer,
            temporary_password: self.provisioning.temporary_password.clone(),
        })
    }

    fn new_identity(&self, details: &NewTrainer) -> NewIdentity {
        NewIdentity {
            email: details.email.clone(),
            password: self.provisioning.temporary_password.expose_secret().clone(),
            name: details.name.clone(),
            email_confirmed: true,
        }
    }

    async fn remove_identity(&self, identity_id: &IdentityId) {
        if let Err(e) = self.identity.delete_user(identity_id).await {
            tracing::error!(
                identity_id = %identity_id,
                error = %e,
                "Failed to remove identity account after trainer insert failed"
            );
        }
    }
}
