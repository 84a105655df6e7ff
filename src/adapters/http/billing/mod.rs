//! HTTP adapter for billing-provider webhooks.
//!
//! - `POST /functions/stripe-webhook` - subscription and invoice events

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::webhook_routes;
