//! Serves blobs held by the in-process blob store
//!
//! GET /blobs/{*path}

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use shared::error::AppError;

use crate::error::ServiceError;
use crate::state::AppState;

pub async fn get_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let blob = state
        .blobs
        .get(&path)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::not_found("Blob"))?;

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        blob.bytes,
    )
        .into_response())
}
