//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresTrainerRepository` - trainer accounts
//! - `PostgresPlanReader` - plan catalog
//! - `PostgresSubscriptionRepository` - subscription rows and counters
//! - `PostgresStudentRepository` - student roster
//! - `PostgresPaymentHistoryRepository` - append-only payment history
//! - `PostgresWebhookConfigReader` - billing webhook integrations

mod payment_history_repository;
mod plan_reader;
mod pool;
mod student_repository;
mod subscription_repository;
mod trainer_repository;
mod webhook_config_reader;

pub use payment_history_repository::PostgresPaymentHistoryRepository;
pub use plan_reader::PostgresPlanReader;
pub use pool::{create_pool, run_migrations};
pub use student_repository::PostgresStudentRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use trainer_repository::PostgresTrainerRepository;
pub use webhook_config_reader::PostgresWebhookConfigReader;
