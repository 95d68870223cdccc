//! Uploaded image storage.
//!
//! Images arrive as multipart fields, are validated (JPEG/PNG/WEBP, 5 MB
//! cap) and written under the upload root with a generated name. Records
//! store the `/uploads/...`-style relative path; `tower_http::services::ServeDir`
//! serves the files back. Deletion never happens inline in a request; stale
//! files go through the `cleanup` worker.

pub mod cleanup;

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::backend::error::ApiError;

/// Upload size cap: 5 MB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Subdirectory for recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads";
/// Subdirectory for profile avatars.
pub const AVATAR_DIR: &str = "avatars";

/// File extension for an accepted image content type, `None` otherwise.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Resolve a stored relative path (e.g. `/uploads/abc.jpg`) against the
/// upload root.
pub fn absolute_path(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches('/'))
}

/// A stored image, addressed by the relative path kept in records.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub relative_path: String,
}

/// Validate and persist an uploaded image under `root/subdir`.
pub async fn store_image(
    root: &Path,
    subdir: &str,
    content_type: &str,
    data: &[u8],
) -> Result<StoredImage, ApiError> {
    let ext = extension_for(content_type)
        .ok_or_else(|| ApiError::validation("Unsupported file type."))?;

    if data.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::validation("Image exceeds the 5 MB limit."));
    }

    let name = format!("{}.{ext}", Uuid::new_v4());
    let dir = root.join(subdir);

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::internal(format!("failed to create upload dir: {e}")))?;

    tokio::fs::write(dir.join(&name), data)
        .await
        .map_err(|e| ApiError::internal(format!("failed to write upload: {e}")))?;

    Ok(StoredImage {
        relative_path: format!("/{subdir}/{name}"),
    })
}
