//! Menu editing endpoints

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{DisplaySettingsUpdate, Menu};

use super::{ApiResult, read_file_field};
use crate::menu::MenuCommand;
use crate::services::images::{self, ImageKind};
use crate::state::AppState;

/// POST /api/restaurants/{id}/menu
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Menu>), AppError> {
    let mut session = state.session(&id).await?;
    let menu = session.create_menu().await?;
    Ok((StatusCode::CREATED, Json(menu.clone())))
}

/// A menu command, optionally pinned to the menu version the client saw
///
/// `{"type": "addSection", "name": "Drinks", "expectedVersion": 3}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCommandRequest {
    #[serde(flatten)]
    pub command: MenuCommand,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// POST /api/restaurants/{id}/menu/commands
pub async fn apply_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MenuCommandRequest>,
) -> ApiResult<Menu> {
    let mut session = state.session(&id).await?;
    let menu = session.apply(&req.command, req.expected_version).await?;
    Ok(Json(menu.clone()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    #[serde(flatten)]
    pub patch: DisplaySettingsUpdate,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// PATCH /api/restaurants/{id}/menu/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettingsRequest>,
) -> ApiResult<Menu> {
    let mut session = state.session(&id).await?;
    let menu = session
        .update_settings(&req.patch, req.expected_version)
        .await?;
    Ok(Json(menu.clone()))
}

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

/// POST /api/restaurants/{id}/images
///
/// Stores the image only; the URL is attached to an item by a later
/// `addItem` or `editItem` command.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ImageUploadResponse> {
    let session = state.session(&id).await?;
    let (filename, data) = read_file_field(multipart).await?;
    let url = images::store_upload(
        state.blobs.as_ref(),
        ImageKind::MenuItem,
        &session.restaurant().id,
        &filename,
        &data,
    )
    .await?;
    Ok(Json(ImageUploadResponse { url }))
}
