//! Subscription repository port.
//!
//! Subscriptions are never deleted. Plan changes cancel and insert; provider
//! events update in place, keyed by the provider's subscription id.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriptionId, TrainerId};
use crate::domain::subscription::{Subscription, SubscriptionPlan};

/// A subscription together with the plan it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionWithPlan {
    pub subscription: Subscription,
    pub plan: SubscriptionPlan,
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Overwrites the mutable fields of an existing row.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if no row has this id
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Looks up a row by the billing provider's subscription id.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Subscription>, DomainError>;

    /// The trainer's most recently created subscription whose status grants
    /// entitlement, joined with its plan.
    async fn find_current_for_trainer(
        &self,
        trainer_id: &TrainerId,
    ) -> Result<Option<SubscriptionWithPlan>, DomainError>;

    /// Marks every entitled subscription of the trainer as canceled.
    ///
    /// Returns the number of rows changed.
    async fn cancel_entitled_for_trainer(&self, trainer_id: &TrainerId) -> Result<u64, DomainError>;

    /// Adds `delta` to the denormalized student counter, never going below 0.
    async fn adjust_student_count(&self, id: &SubscriptionId, delta: i32) -> Result<(), DomainError>;
}
