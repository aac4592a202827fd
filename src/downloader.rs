//! Snapshot download, validation and storage for a single camera

use crate::camera::CameraRecord;
use crate::config::DownloadConfig;
use crate::http::{FetchError, HttpClient, HttpConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// JPEG start-of-image marker
pub const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidImagePayload {
    #[error("image too small: {size} bytes (minimum {min})")]
    TooSmall { size: usize, min: usize },

    #[error("payload is not a JPEG image")]
    NotJpeg,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("image fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("invalid image: {0}")]
    InvalidPayload(#[from] InvalidImagePayload),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// Reject bodies that are too short or lack the JPEG marker
pub fn validate_image(body: &[u8], min_bytes: usize) -> std::result::Result<(), InvalidImagePayload> {
    if body.len() < min_bytes {
        return Err(InvalidImagePayload::TooSmall {
            size: body.len(),
            min: min_bytes,
        });
    }
    if !body.starts_with(&JPEG_MAGIC) {
        return Err(InvalidImagePayload::NotJpeg);
    }
    Ok(())
}

/// Directory holding one camera's snapshots for one day
pub fn camera_dir(output_root: &Path, camera: &CameraRecord, date_dir: &str) -> PathBuf {
    output_root.join(&camera.directory_key).join(date_dir)
}

/// `<output_root>/<directory_key>/<date_dir>/<timestamp>.jpg`
pub fn image_path(output_root: &Path, camera: &CameraRecord, date_dir: &str, timestamp: &str) -> PathBuf {
    camera_dir(output_root, camera, date_dir).join(format!("{timestamp}.jpg"))
}

/// Fetches camera snapshots with the portal's expected header set
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: HttpClient,
    min_image_bytes: usize,
}

impl ImageDownloader {
    pub fn new(config: &DownloadConfig) -> std::result::Result<Self, FetchError> {
        let client = HttpClient::new(HttpConfig {
            timeout: config.image_timeout(),
            headers: config.image_headers(),
        })?;

        Ok(Self {
            client,
            min_image_bytes: config.min_image_bytes,
        })
    }

    /// Download one snapshot and store it, returning the written path.
    ///
    /// An existing file with the same timestamp is overwritten.
    pub async fn download(
        &self,
        camera: &CameraRecord,
        date_dir: &str,
        timestamp: &str,
        output_root: &Path,
    ) -> Result<PathBuf> {
        let dir = camera_dir(output_root, camera, date_dir);
        tokio::fs::create_dir_all(&dir).await.inspect_err(|e| {
            error!(camera_id = %camera.id, dir = %dir.display(), error = %e, "Failed to create camera directory");
        })?;

        let body = self.client.get_bytes(&camera.image_url).await.inspect_err(|e| {
            error!(camera_id = %camera.id, url = %camera.image_url, error = %e, "Failed to download image");
        })?;

        validate_image(&body, self.min_image_bytes).inspect_err(|e| {
            warn!(camera_id = %camera.id, size = body.len(), error = %e, "Rejected image");
        })?;

        let path = dir.join(format!("{timestamp}.jpg"));
        tokio::fs::write(&path, &body).await.inspect_err(|e| {
            error!(camera_id = %camera.id, path = %path.display(), error = %e, "Failed to write image");
        })?;

        info!(
            camera_id = %camera.id,
            name = %camera.name,
            size = body.len(),
            "Downloaded image"
        );

        Ok(path)
    }
}
