//! Axum router configuration for student endpoints.

use axum::routing::{delete, post};
use axum::Router;

use crate::adapters::http::router::method_not_allowed;
use crate::adapters::http::state::AppState;

use super::handlers::{create_student, deactivate_student};

/// Routes mounted under `/api`.
///
/// # Routes
/// - `POST /students` - Create a student (entitlement-gated)
/// - `DELETE /students/:id` - Deactivate a student
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", post(create_student).fallback(method_not_allowed))
        .route(
            "/students/:id",
            delete(deactivate_student).fallback(method_not_allowed),
        )
}
