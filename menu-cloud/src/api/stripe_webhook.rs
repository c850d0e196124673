//! Stripe webhook handler
//!
//! POST /api/webhook — raw body for signature verification

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::billing::{SubscriptionReconciler, WebhookError};
use crate::state::AppState;

/// Handle incoming Stripe webhook events
///
/// Only a bad signature or an undecodable event is reported back. Failures
/// while applying a verified event are logged and acknowledged, since the
/// event id is already recorded and a redelivery would be skipped anyway.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let sig_header = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    let reconciler = SubscriptionReconciler::new(
        state.store.as_ref(),
        &state.config.stripe_webhook_secret,
        state.config.webhook_tolerance_secs,
    );

    match reconciler
        .handle(&body, sig_header, chrono::Utc::now().timestamp())
        .await
    {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Webhook processed");
        }
        Err(WebhookError::InvalidSignature(e)) => {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid signature" })),
            )
                .into_response();
        }
        Err(WebhookError::Malformed(e)) => {
            tracing::warn!(error = %e, "Failed to parse webhook event");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid payload" })),
            )
                .into_response();
        }
        Err(WebhookError::Store(e)) => {
            tracing::error!(error = %e, "Webhook processing failed");
        }
    }

    Json(json!({ "received": true })).into_response()
}
