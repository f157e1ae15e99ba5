//! Image Upload Handler
//!
//! PNG, JPEG and WebP uploads are decoded, re-encoded as JPEG and stored
//! under their content hash, so the same image is only kept once.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
}

fn calculate_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Extension from the file name, else from the part's content type
fn resolve_extension(filename: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    from_name.or_else(|| {
        content_type
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.iter().find(|ext| SUPPORTED_FORMATS.contains(ext)))
            .map(|ext| ext.to_string())
    })
}

fn validate_image(data: &[u8], ext: &str) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }
    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{ext}'. Supported: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Decode and re-encode as JPEG
fn compress_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    Ok(buffer)
}

/// Write `{hash}.jpg` unless it is already there
async fn store(uploads_dir: &Path, hash: &str, data: &[u8]) -> AppResult<(String, bool)> {
    let filename = format!("{hash}.jpg");
    let path: PathBuf = uploads_dir.join(&filename);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok((filename, false));
    }
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, format!("Failed to create uploads dir: {e}")))?;
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::with_message(ErrorCode::StorageError, format!("Failed to save file: {e}")))?;
    Ok((filename, true))
}

pub async fn upload(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() == Some("file") {
            let ext = resolve_extension(field.file_name(), field.content_type());
            let original_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
            file = Some((ext, original_name, data));
            break;
        }
    }

    let (ext, original_name, data) = file.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;
    let ext = ext.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            "Could not determine the file format",
        )
    })?;
    validate_image(&data, &ext)?;

    let compressed = tokio::task::spawn_blocking(move || compress_image(&data))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {e}")))??;

    let hash = calculate_hash(&compressed);
    let (filename, created) = store(&state.uploads_dir(), &hash, &compressed).await?;

    tracing::info!(
        user_id = current_user.id,
        original_name = ?original_name,
        filename = %filename,
        size = compressed.len(),
        deduplicated = !created,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/uploads/{filename}"),
        filename,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_resolve_extension() {
        assert_eq!(resolve_extension(Some("a.PNG"), None).as_deref(), Some("png"));
        assert_eq!(
            resolve_extension(None, Some("image/webp")).as_deref(),
            Some("webp")
        );
        assert_eq!(resolve_extension(None, Some("text/plain")), None);
        assert_eq!(resolve_extension(None, None), None);
    }

    #[test]
    fn test_validate_rules() {
        let err = validate_image(&[], "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let err = validate_image(&big, "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = validate_image(b"GIF89a", "gif").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn test_compress_produces_jpeg() {
        let jpeg = compress_image(&png_bytes()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert!(compress_image(b"not an image").is_err());
    }

    #[tokio::test]
    async fn test_store_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = compress_image(&png_bytes()).unwrap();
        let hash = calculate_hash(&jpeg);

        let (first, created) = store(dir.path(), &hash, &jpeg).await.unwrap();
        assert!(created);
        let (second, created) = store(dir.path(), &hash, &jpeg).await.unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(first, format!("{hash}.jpg"));
    }
}
