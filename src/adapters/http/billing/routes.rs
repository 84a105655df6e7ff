//! Axum router configuration for billing webhooks.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::router::method_not_allowed;
use crate::adapters::http::state::AppState;

use super::handlers::handle_stripe_webhook;

/// Routes mounted under `/functions`.
///
/// Webhooks carry no bearer token; deliveries are checked against the
/// stored webhook configuration instead.
///
/// # Routes
/// - `POST /stripe-webhook` - Handle billing-provider events
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/stripe-webhook",
        post(handle_stripe_webhook).fallback(method_not_allowed),
    )
}
