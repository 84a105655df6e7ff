//! Axum router configuration for subscription endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::router::method_not_allowed;
use crate::adapters::http::state::AppState;

use super::handlers::{assign_plan, check_entitlement, start_trial};

/// Routes mounted under `/api`.
///
/// # Routes
///
/// ## Trainer Endpoints
/// - `GET /entitlements/:action` - Entitlement decision for the caller
/// - `POST /subscriptions/trial` - Start a trial
///
/// ## Admin Endpoints
/// - `POST /subscriptions/assign` - Assign a plan to any trainer
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entitlements/:action",
            get(check_entitlement).fallback(method_not_allowed),
        )
        .route(
            "/subscriptions/assign",
            post(assign_plan).fallback(method_not_allowed),
        )
        .route(
            "/subscriptions/trial",
            post(start_trial).fallback(method_not_allowed),
        )
}
