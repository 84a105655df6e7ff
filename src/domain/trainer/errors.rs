//! Trainer-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Message shown when the CPF unique constraint fires.
pub const DUPLICATE_CPF_MESSAGE: &str = "A personal trainer with this CPF already exists";

/// Errors raised while provisioning or loading trainers.
#[derive(Debug, Clone, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", DUPLICATE_CPF_MESSAGE)]
    DuplicateCpf,

    /// Identity provider rejected the account operation.
    #[error("Failed to create user account: {0}")]
    IdentityProvider(String),

    #[error("Only the super administrator can create trainers")]
    Forbidden,

    #[error("Trainer not found")]
    NotFound,

    #[error("Failed to create personal trainer: {0}")]
    Infrastructure(String),
}

impl TrainerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TrainerError::Validation(_) => ErrorCode::ValidationFailed,
            TrainerError::DuplicateCpf => ErrorCode::DuplicateCpf,
            TrainerError::IdentityProvider(_) => ErrorCode::IdentityProviderError,
            TrainerError::Forbidden => ErrorCode::Forbidden,
            TrainerError::NotFound => ErrorCode::TrainerNotFound,
            TrainerError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for TrainerError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DuplicateCpf => TrainerError::DuplicateCpf,
            ErrorCode::TrainerNotFound => TrainerError::NotFound,
            ErrorCode::IdentityProviderError => TrainerError::IdentityProvider(err.message),
            _ => TrainerError::Infrastructure(err.message),
        }
    }
}
