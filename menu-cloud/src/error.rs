//! Unified service-layer error type for menu-cloud
//!
//! `ServiceError` bridges store/blob errors and the API-layer error
//! (`AppError`) so `?` works from the persistence adapter up to the handlers
//! without per-call `.map_err` boilerplate.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::blob::BlobError;
use crate::menu::MenuError;
use crate::store::{MENUS, RESTAURANTS, StoreError};

#[derive(Debug)]
pub enum ServiceError {
    /// Document store failure (logged, mapped by kind)
    Store(StoreError),
    /// Blob store failure (logged, mapped to FileStorageFailed)
    Blob(BlobError),
    /// Business-rule error (transparent pass-through to client)
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<BlobError> for ServiceError {
    fn from(e: BlobError) -> Self {
        ServiceError::Blob(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<MenuError> for ServiceError {
    fn from(e: MenuError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(StoreError::VersionConflict { id, .. }) => {
                AppError::new(ErrorCode::MenuVersionConflict).with_detail("menu_id", id)
            }
            ServiceError::Store(StoreError::NotFound { collection, id })
                if collection == RESTAURANTS =>
            {
                AppError::restaurant_not_found(id)
            }
            ServiceError::Store(StoreError::NotFound { collection, id }) if collection == MENUS => {
                AppError::new(ErrorCode::MenuNotFound).with_detail("menu_id", id)
            }
            ServiceError::Store(store_err) => {
                tracing::error!(error = %store_err, "Document store error");
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::Blob(BlobError::InvalidPath(path)) => {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Invalid path: {path}"))
            }
            ServiceError::Blob(blob_err) => {
                tracing::error!(error = %blob_err, "Blob store error");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
