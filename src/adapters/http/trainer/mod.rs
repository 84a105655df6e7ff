//! HTTP adapter for trainer provisioning.
//!
//! - `POST /functions/create-trainer` - super-admin creates a trainer account

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::trainer_routes;
