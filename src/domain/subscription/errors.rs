//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | PlanNotFound / PlanInactive | 400 |
//! | TrainerNotFound / StudentNotFound | 404 |
//! | LimitReached | 403 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ValidationError};

use super::DenialReason;

#[derive(Debug, Clone, Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Plan not found: {0}")]
    PlanNotFound(PlanId),

    #[error("Plan {0} is no longer offered")]
    PlanInactive(PlanId),

    #[error("Trainer not found")]
    TrainerNotFound,

    #[error("Student not found")]
    StudentNotFound,

    #[error("{}", .0.message())]
    LimitReached(DenialReason),

    #[error("Subscription store error: {0}")]
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::Validation(_) | SubscriptionError::PlanInactive(_) => {
                ErrorCode::ValidationFailed
            }
            SubscriptionError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            SubscriptionError::TrainerNotFound => ErrorCode::TrainerNotFound,
            SubscriptionError::StudentNotFound => ErrorCode::StudentNotFound,
            SubscriptionError::LimitReached(_) => ErrorCode::Forbidden,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::TrainerNotFound => SubscriptionError::TrainerNotFound,
            ErrorCode::StudentNotFound => SubscriptionError::StudentNotFound,
            _ => SubscriptionError::Infrastructure(err.message),
        }
    }
}
