//! HTTP adapter for the student roster.
//!
//! - `POST /api/students` - entitlement-gated creation
//! - `DELETE /api/students/:id` - soft delete

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::student_routes;
