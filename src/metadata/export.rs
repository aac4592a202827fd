//! JSON and CSV exports of the normalized camera list

use crate::camera::CameraRecord;
use crate::config::ExportConfig;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Write records as a pretty-printed JSON array (non-ASCII kept literal)
pub async fn save_json(path: &Path, records: &[CameraRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Write records as CSV with a header row. Nothing is written for an empty list.
pub async fn save_csv(path: &Path, records: &[CameraRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let data = writer.into_inner().map_err(|e| e.into_error())?;

    tokio::fs::write(path, data).await?;
    Ok(())
}

/// Write both exports
pub async fn save_all(config: &ExportConfig, records: &[CameraRecord]) -> Result<()> {
    save_json(&config.json_path, records).await?;
    save_csv(&config.csv_path, records).await?;

    info!(
        json = %config.json_path.display(),
        csv = %config.csv_path.display(),
        count = records.len(),
        "Camera metadata exported"
    );
    Ok(())
}
