//! Subscription checkout
//!
//! - POST /api/create-checkout-session — `{restaurantId, priceId?}` → `{sessionId}`
//! - GET  /api/redirect-to-checkout?sessionId= — 302 to the hosted checkout page

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::ApiResult;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::stripe::{self, CheckoutRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub restaurant_id: String,
    pub price_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub session_id: String,
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckoutRequest>,
) -> ApiResult<CreateCheckoutResponse> {
    let restaurant = db::restaurants::get(state.store.as_ref(), &req.restaurant_id)
        .await
        .map_err(ServiceError::from)?;

    let price_id = req
        .price_id
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.config.stripe_price_id.clone());
    let checkout = CheckoutRequest::for_restaurant(
        &state.config.public_base_url,
        &restaurant.id,
        &price_id,
        state.config.stripe_trial_days,
    );

    let session_id = state
        .checkout
        .create_checkout_session(&checkout)
        .await
        .map_err(|e| {
            tracing::error!(restaurant_id = %restaurant.id, error = %e, "Stripe checkout creation failed");
            AppError::with_message(
                ErrorCode::PaymentSetupFailed,
                "Failed to create checkout session",
            )
        })?;

    tracing::info!(restaurant_id = %restaurant.id, session_id = %session_id, "Checkout session created");
    Ok(Json(CreateCheckoutResponse { session_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectQuery {
    pub session_id: Option<String>,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub async fn redirect_to_checkout(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let Some(session_id) = query.session_id.filter(|s| !s.is_empty()) else {
        return error_body(StatusCode::BAD_REQUEST, "Missing sessionId");
    };
    if !stripe::is_valid_session_id(&session_id) {
        return error_body(StatusCode::BAD_REQUEST, "Invalid sessionId");
    }

    match state.checkout.checkout_session_url(&session_id).await {
        Ok(Some(url)) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Ok(None) => error_body(StatusCode::NOT_FOUND, "Checkout session URL not found"),
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Failed to retrieve checkout session");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to redirect to checkout",
            )
        }
    }
}
