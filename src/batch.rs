//! Sequential download pass over a camera list

use crate::camera::CameraRecord;
use crate::config::DownloadConfig;
use crate::downloader::{DownloadError, ImageDownloader};
use crate::http::FetchError;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Date directory and file timestamp shared by every camera in one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStamp {
    /// `YYYYMMDD`
    pub date_dir: String,
    /// `YYYYMMDD_HHMM`
    pub timestamp: String,
}

impl BatchStamp {
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            date_dir: at.format("%Y%m%d").to_string(),
            timestamp: at.format("%Y%m%d_%H%M").to_string(),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }
}

#[derive(Debug)]
pub struct CameraFailure {
    pub camera_id: String,
    pub error: DownloadError,
}

/// Result of one batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub successful: usize,
    pub total: usize,
    /// Files written, in camera order
    pub written: Vec<PathBuf>,
    pub failures: Vec<CameraFailure>,
}

impl BatchReport {
    /// `(successful, total)`
    pub fn counts(&self) -> (usize, usize) {
        (self.successful, self.total)
    }
}

/// Drives the downloader across cameras one at a time
#[derive(Debug, Clone)]
pub struct BatchRunner {
    downloader: ImageDownloader,
    output_root: PathBuf,
    request_delay: Duration,
}

impl BatchRunner {
    pub fn new(downloader: ImageDownloader, output_root: impl Into<PathBuf>, request_delay: Duration) -> Self {
        Self {
            downloader,
            output_root: output_root.into(),
            request_delay,
        }
    }

    pub fn from_config(config: &DownloadConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            ImageDownloader::new(config)?,
            config.output_dir.clone(),
            config.request_delay(),
        ))
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Run a batch stamped with the current local time
    pub async fn run(&self, cameras: &[CameraRecord], max_cameras: Option<usize>) -> BatchReport {
        self.run_at(cameras, max_cameras, BatchStamp::now()).await
    }

    /// Download every camera (or the first `max_cameras`) under `stamp`.
    ///
    /// A failing camera never aborts the batch.
    pub async fn run_at(
        &self,
        cameras: &[CameraRecord],
        max_cameras: Option<usize>,
        stamp: BatchStamp,
    ) -> BatchReport {
        let cameras = match max_cameras {
            Some(max) => &cameras[..max.min(cameras.len())],
            None => cameras,
        };

        let mut report = BatchReport {
            total: cameras.len(),
            ..BatchReport::default()
        };

        info!(count = cameras.len(), timestamp = %stamp.timestamp, "Downloading camera images");

        for (i, camera) in cameras.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match self
                .downloader
                .download(camera, &stamp.date_dir, &stamp.timestamp, &self.output_root)
                .await
            {
                Ok(path) => {
                    report.successful += 1;
                    report.written.push(path);
                }
                Err(error) => report.failures.push(CameraFailure {
                    camera_id: camera.id.clone(),
                    error,
                }),
            }
        }

        info!(
            successful = report.successful,
            total = report.total,
            "Download finished: {}/{} successful",
            report.successful,
            report.total
        );

        report
    }
}
