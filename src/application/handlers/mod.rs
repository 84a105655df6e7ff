//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;
pub mod student;
pub mod subscription;
pub mod trainer;

pub use billing::{ReceiveWebhookCommand, ReconcileOutcome, ReconcileWebhookHandler};
pub use student::{
    CreateStudentCommand, CreateStudentHandler, DeactivateStudentCommand, DeactivateStudentHandler,
};
pub use subscription::{
    AssignPlanCommand, AssignPlanHandler, AssignPlanResult, CheckEntitlementHandler,
    CheckEntitlementQuery, CheckEntitlementResult, StartTrialCommand,
};
pub use trainer::{
    CreateTrainerCommand, CreateTrainerHandler, CreateTrainerResult, TrainerProvisioning,
};
