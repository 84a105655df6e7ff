//! Subscription handlers.
//!
//! ## Commands
//! - Assigning a plan (admin) and starting a checkout trial
//!
//! ## Queries
//! - Checking whether a trainer may perform an action

mod assign_plan;
mod check_entitlement;

pub use assign_plan::{AssignPlanCommand, AssignPlanHandler, AssignPlanResult, StartTrialCommand};
pub use check_entitlement::{CheckEntitlementHandler, CheckEntitlementQuery, CheckEntitlementResult};
