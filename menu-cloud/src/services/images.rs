//! Image uploads: validate → JPEG compress → SHA256 → blob store
//!
//! Stored at `{prefix}/{restaurant_id}/{hash}.jpg`; identical content lands on
//! the same path, so re-uploading is idempotent.

use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use std::io::Cursor;

use crate::blob::BlobStore;
use crate::error::ServiceResult;

/// Maximum file size (20MB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

const JPEG_QUALITY: u8 = 85;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Logo,
    MenuItem,
}

impl ImageKind {
    fn prefix(&self) -> &'static str {
        match self {
            ImageKind::Logo => "logos",
            ImageKind::MenuItem => "menu-items",
        }
    }
}

pub fn blob_path(kind: ImageKind, restaurant_id: &str, hash: &str) -> String {
    format!("{}/{restaurant_id}/{hash}.jpg", kind.prefix())
}

/// Re-encoded image and its content hash
#[derive(Debug)]
pub struct ProcessedImage {
    pub jpeg: Vec<u8>,
    pub hash: String,
}

/// Validate an upload and normalize it to JPEG
pub fn process_upload(filename: &str, data: &[u8]) -> Result<ProcessedImage, AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large: {} bytes (max {MAX_FILE_SIZE})", data.len()),
        ));
    }

    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported format: {ext}. Supported: png, jpg, jpeg, webp"),
        ));
    }

    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut jpeg = Vec::new();
    {
        let mut cursor = Cursor::new(&mut jpeg);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Image compression failed: {e}"),
            )
        })?;
    }

    let hash = hex::encode(Sha256::digest(&jpeg));
    Ok(ProcessedImage { jpeg, hash })
}

/// Process and store an upload, returning its public URL
pub async fn store_upload(
    blobs: &dyn BlobStore,
    kind: ImageKind,
    restaurant_id: &str,
    filename: &str,
    data: &[u8],
) -> ServiceResult<String> {
    let processed = process_upload(filename, data)?;
    let path = blob_path(kind, restaurant_id, &processed.hash);
    let handle = blobs.put(&path, processed.jpeg, "image/jpeg").await?;

    tracing::info!(
        restaurant_id = %restaurant_id,
        hash = %processed.hash,
        kind = ?kind,
        "Image uploaded"
    );
    Ok(blobs.public_url(&handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_process_png_to_jpeg() {
        let processed = process_upload("logo.PNG", &png_bytes()).unwrap();
        assert_eq!(processed.hash.len(), 64);
        // JPEG SOI marker
        assert_eq!(&processed.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            process_upload("a.png", &[]).unwrap_err().code,
            ErrorCode::EmptyFile
        );
        assert_eq!(
            process_upload("a.gif", &png_bytes()).unwrap_err().code,
            ErrorCode::UnsupportedFileFormat
        );
        assert_eq!(
            process_upload("a.png", b"not an image").unwrap_err().code,
            ErrorCode::InvalidImageFile
        );
        let huge = vec![0u8; MAX_FILE_SIZE + 1];
        assert_eq!(
            process_upload("a.png", &huge).unwrap_err().code,
            ErrorCode::FileTooLarge
        );
    }

    #[tokio::test]
    async fn test_store_upload_is_content_addressed() {
        let blobs = MemoryBlobStore::new("http://localhost:3000/blobs");
        let a = store_upload(&blobs, ImageKind::MenuItem, "r1", "a.png", &png_bytes())
            .await
            .unwrap();
        let b = store_upload(&blobs, ImageKind::MenuItem, "r1", "b.png", &png_bytes())
            .await
            .unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("http://localhost:3000/blobs/menu-items/r1/"));
        assert_eq!(blobs.len(), 1);
    }
}
