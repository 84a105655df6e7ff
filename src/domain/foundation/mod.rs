//! Foundation module - Shared domain primitives.
//!
//! Identifiers, time, error types and authentication types used by every
//! other domain module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{IdentityId, PaymentId, PlanId, StudentId, SubscriptionId, TrainerId};
pub use timestamp::Timestamp;
