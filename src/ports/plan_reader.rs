//! Plan catalog port (read-only).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::subscription::SubscriptionPlan;

#[async_trait]
pub trait PlanReader: Send + Sync {
    /// Returns the plan whether or not it is still offered.
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;
}
