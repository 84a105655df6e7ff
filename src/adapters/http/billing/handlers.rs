//! HTTP handlers for billing webhooks.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::ReceiveWebhookCommand;

use super::dto::WebhookAck;

/// Header the billing provider signs deliveries with.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// POST /functions/stripe-webhook - Reconcile a billing-provider event
///
/// Per-event failures are logged and acknowledged so the provider does not
/// retry; only delivery-level problems produce an error status.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = ReceiveWebhookCommand {
        signature,
        payload: body.to_vec(),
    };

    let outcome = handler.receive(cmd).await?;
    tracing::debug!(outcome = ?outcome, "Webhook delivery processed");

    Ok(Json(WebhookAck::received()))
}
