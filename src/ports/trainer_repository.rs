//! Trainer repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, IdentityId, TrainerId};
use crate::domain::trainer::{Cpf, Trainer};

#[async_trait]
pub trait TrainerRepository: Send + Sync {
    /// Inserts a new trainer.
    ///
    /// # Errors
    ///
    /// - `DuplicateCpf` if another trainer has the same CPF
    /// - `DuplicateEmail` if another trainer has the same email
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, trainer: &Trainer) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError>;

    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Trainer>, DomainError>;

    /// Looks up the trainer bound to an identity-provider account.
    async fn find_by_identity(&self, identity: &IdentityId) -> Result<Option<Trainer>, DomainError>;
}
