//! HTTP adapter for plans and entitlements.
//!
//! - `GET /api/entitlements/:action` - can the calling trainer do this?
//! - `POST /api/subscriptions/assign` - super-admin assigns a plan
//! - `POST /api/subscriptions/trial` - trainer starts a trial

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::subscription_routes;
