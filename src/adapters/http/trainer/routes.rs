//! Axum router configuration for trainer provisioning.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::router::method_not_allowed;
use crate::adapters::http::state::AppState;

use super::handlers::create_trainer;

/// Routes mounted under `/functions`.
///
/// # Routes
/// - `POST /create-trainer` - Provision a trainer (super-admin bearer token)
pub fn trainer_routes() -> Router<AppState> {
    Router::new().route(
        "/create-trainer",
        post(create_trainer).fallback(method_not_allowed),
    )
}
