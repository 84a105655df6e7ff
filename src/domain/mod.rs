//! Domain layer - Pure business logic with no external dependencies.
//!
//! - `foundation` - Shared value objects, ids and errors
//! - `trainer` - Trainers and their students
//! - `subscription` - Plans, subscriptions, payments and entitlement rules
//! - `billing` - Billing-provider webhook events

pub mod billing;
pub mod foundation;
pub mod subscription;
pub mod trainer;
