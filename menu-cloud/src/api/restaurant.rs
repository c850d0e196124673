//! Restaurant dashboard endpoints
//!
//! - POST  /api/restaurants
//! - PATCH /api/restaurants/{id}
//! - GET   /api/restaurants/{id}/dashboard | analytics | qr.svg | flyer
//! - POST  /api/restaurants/{id}/logo (multipart)

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

use super::{ApiResult, read_file_field};
use crate::db;
use crate::error::ServiceError;
use crate::gate::{self, Feature};
use crate::qr::{self, QrOptions};
use crate::services::images::{self, ImageKind};
use crate::services::restaurant::create_restaurant;
use crate::state::AppState;
use crate::view::{self, AnalyticsView, DashboardView};

async fn load_restaurant(state: &AppState, id: &str) -> Result<Restaurant, AppError> {
    Ok(db::restaurants::get(state.store.as_ref(), id)
        .await
        .map_err(ServiceError::from)?)
}

/// POST /api/restaurants
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<RestaurantCreate>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    let restaurant = create_restaurant(state.store.as_ref(), &req).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /api/restaurants/{id}/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DashboardView> {
    let session = state.session(&id).await?;
    Ok(Json(view::dashboard(
        session.restaurant(),
        session.menu(),
        &state.config.public_base_url,
    )))
}

/// PATCH /api/restaurants/{id}
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RestaurantUpdate>,
) -> ApiResult<Restaurant> {
    let mut session = state.session(&id).await?;
    let restaurant = session.update_profile(&req).await?;
    Ok(Json(restaurant.clone()))
}

/// POST /api/restaurants/{id}/logo
pub async fn upload_logo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Restaurant> {
    let mut session = state.session(&id).await?;
    // Checked before the upload so a free account never stores a blob
    gate::ensure_allowed(session.restaurant(), Feature::Branding)?;

    let (filename, data) = read_file_field(multipart).await?;
    let url = images::store_upload(state.blobs.as_ref(), ImageKind::Logo, &id, &filename, &data)
        .await?;

    let update = RestaurantUpdate {
        logo_url: Some(Some(url)),
        ..Default::default()
    };
    let restaurant = session.update_profile(&update).await?;
    Ok(Json(restaurant.clone()))
}

/// GET /api/restaurants/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AnalyticsView> {
    let session = state.session(&id).await?;
    gate::ensure_allowed(session.restaurant(), Feature::Analytics)?;
    Ok(Json(view::analytics(session.restaurant(), session.menu())))
}

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub dark: Option<String>,
    pub light: Option<String>,
    pub width: Option<u32>,
}

/// GET /api/restaurants/{id}/qr.svg
///
/// Defaults to the restaurant's theme color on white.
pub async fn qr_svg(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<QrQuery>,
) -> Result<Response, AppError> {
    let restaurant = load_restaurant(&state, &id).await?;
    let defaults = QrOptions::default();
    let options = QrOptions {
        dark: query.dark.unwrap_or_else(|| restaurant.theme_color.clone()),
        light: query.light.unwrap_or(defaults.light),
        width: query.width.unwrap_or(defaults.width),
        quiet_zone: defaults.quiet_zone,
    };

    let url = qr::menu_url(&state.config.public_base_url, &restaurant.slug);
    let svg = qr::render_svg(&url, &options)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// GET /api/restaurants/{id}/flyer
pub async fn flyer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let restaurant = load_restaurant(&state, &id).await?;
    gate::ensure_allowed(&restaurant, Feature::PrintableFlyer)?;

    let url = qr::menu_url(&state.config.public_base_url, &restaurant.slug);
    let options = QrOptions {
        dark: restaurant.theme_color.clone(),
        ..QrOptions::default()
    };
    let svg = qr::render_svg(&url, &options)?;
    Ok(Html(view::render_flyer(&restaurant, &url, &svg)))
}
