//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity
//!
//! - `SessionValidator` - bearer token validation
//! - `IdentityProvider` - account creation and removal
//!
//! ## Store
//!
//! - `TrainerRepository`, `StudentRepository`
//! - `PlanReader`, `SubscriptionRepository`, `PaymentHistoryRepository`
//! - `WebhookConfigReader`

mod identity_provider;
mod payment_history_repository;
mod plan_reader;
mod session_validator;
mod student_repository;
mod subscription_repository;
mod trainer_repository;
mod webhook_config_reader;

pub use identity_provider::{IdentityProvider, NewIdentity};
pub use payment_history_repository::PaymentHistoryRepository;
pub use plan_reader::PlanReader;
pub use session_validator::SessionValidator;
pub use student_repository::StudentRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionWithPlan};
pub use trainer_repository::TrainerRepository;
pub use webhook_config_reader::{WebhookConfig, WebhookConfigReader};
