//! Student repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StudentId, TrainerId};
use crate::domain::trainer::Student;

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, student: &Student) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<Student>, DomainError>;

    /// Clears the active flag.
    ///
    /// Returns false if the student was already inactive.
    async fn deactivate(&self, id: &StudentId) -> Result<bool, DomainError>;

    /// Number of active students owned by the trainer.
    async fn count_active(&self, trainer_id: &TrainerId) -> Result<u32, DomainError>;
}
