//! API routes for menu-cloud

pub mod blobs;
pub mod checkout;
pub mod health;
pub mod menu;
pub mod public;
pub mod restaurant;
pub mod stripe_webhook;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::routing::{get, patch, post};
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::images::MAX_FILE_SIZE;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Room for multipart framing around a maximum-size image
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Dashboard (restaurant owner)
    let restaurants = Router::new()
        .route("/api/restaurants", post(restaurant::create))
        .route("/api/restaurants/{id}", patch(restaurant::update_profile))
        .route("/api/restaurants/{id}/dashboard", get(restaurant::dashboard))
        .route("/api/restaurants/{id}/analytics", get(restaurant::analytics))
        .route("/api/restaurants/{id}/qr.svg", get(restaurant::qr_svg))
        .route("/api/restaurants/{id}/flyer", get(restaurant::flyer))
        .route("/api/restaurants/{id}/menu", post(menu::create))
        .route("/api/restaurants/{id}/menu/commands", post(menu::apply_command))
        .route(
            "/api/restaurants/{id}/menu/settings",
            patch(menu::update_settings),
        );

    // Multipart uploads
    let uploads = Router::new()
        .route("/api/restaurants/{id}/logo", post(restaurant::upload_logo))
        .route("/api/restaurants/{id}/images", post(menu::upload_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    // Public menu page (no auth)
    let public = Router::new()
        .route("/api/public/menus/{slug}", get(public::get_menu))
        .route("/blobs/{*path}", get(blobs::get_blob));

    // Checkout + Stripe webhook (signature-verified, raw body)
    let billing = Router::new()
        .route(
            "/api/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/api/redirect-to-checkout", get(checkout::redirect_to_checkout))
        .route("/api/webhook", post(stripe_webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(restaurants)
        .merge(uploads)
        .merge(public)
        .merge(billing)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Read the `file` field of a multipart body as (filename, bytes)
pub(crate) async fn read_file_field(
    mut multipart: Multipart,
) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
            let data = field.bytes().await.map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?;
            return Ok((filename, data.to_vec()));
        }
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}
