//! Subscription domain module.
//!
//! Plans, subscriptions, payment history and the entitlement rules that
//! decide what a trainer may do.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate
//! - `status` - SubscriptionStatus state machine
//! - `plan` - catalog plans and billing periods
//! - `payment` - append-only payment history
//! - `entitlement` - limit evaluation

mod aggregate;
mod entitlement;
mod errors;
mod payment;
mod plan;
mod status;

pub use aggregate::{ExternalRefs, ProviderState, Subscription, MAX_DURATION_DAYS, TRIAL_DAYS};
pub use entitlement::{
    evaluate, Action, DenialReason, EntitlementBasis, EntitlementDecision,
    FREE_TIER_STUDENT_LIMIT,
};
pub use errors::SubscriptionError;
pub use payment::{PaymentRecord, PaymentStatus};
pub use plan::{BillingPeriod, SubscriptionPlan};
pub use status::SubscriptionStatus;
