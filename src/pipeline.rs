//! One full pass: camera list → normalization → exports → image batch

use crate::batch::{BatchReport, BatchRunner};
use crate::camera::{CameraRecord, normalize, normalize_record};
use crate::config::Config;
use crate::http::FetchError;
use crate::metadata::{
    ExportError, HttpMetadataSource, MetadataCache, MetadataFetchError, MetadataSource, export,
    fetch_or_empty,
};
use crate::observability::Metrics;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] FetchError),

    #[error("Metadata source setup failed: {0}")]
    Source(#[from] MetadataFetchError),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Metadata export failed: {0}")]
    Export(#[from] ExportError),

    #[error("No camera data available")]
    NoMetadata,

    #[error("No camera with id '{0}'")]
    CameraNotFound(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Per-run switches
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Cap on cameras per batch; `Some(0)` downloads nothing
    pub max_cameras: Option<usize>,
    /// Download only the camera with this raw id
    pub test_camera: Option<String>,
    /// Write exports, skip image downloads
    pub metadata_only: bool,
    pub use_cache: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_cameras: None,
            test_camera: None,
            metadata_only: false,
            use_cache: true,
        }
    }
}

/// What a run produced
#[derive(Debug)]
pub struct RunSummary {
    pub cameras: usize,
    /// `None` when downloads were skipped
    pub batch: Option<BatchReport>,
}

pub struct Pipeline<S> {
    config: Config,
    source: S,
    runner: BatchRunner,
    metrics: Arc<Metrics>,
}

impl Pipeline<HttpMetadataSource> {
    pub fn from_config(config: Config) -> Result<Self> {
        let source = HttpMetadataSource::from_config(&config.source)?;
        Self::new(config, source)
    }
}

impl<S: MetadataSource> Pipeline<S> {
    pub fn new(config: Config, source: S) -> Result<Self> {
        let runner = BatchRunner::from_config(&config.download)?;
        Ok(Self {
            config,
            source,
            runner,
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub async fn run_once(&self, options: &RunOptions) -> Result<RunSummary> {
        self.metrics.run_started();

        let output_dir = &self.config.download.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| PipelineError::OutputDir {
                path: output_dir.clone(),
                source,
            })?;

        let result = match &options.test_camera {
            Some(camera_id) => self.run_single(camera_id).await,
            None => self.run_all(options).await,
        };

        match &result {
            Ok(summary) => {
                if let Some(batch) = &summary.batch {
                    self.metrics.record_batch(batch.successful, batch.total);
                }
                info!(cameras = summary.cameras, "Run completed");
            }
            Err(PipelineError::NoMetadata) => {
                self.metrics.metadata_unavailable();
                error!("Could not obtain camera data");
            }
            Err(_) => {}
        }

        result
    }

    async fn run_all(&self, options: &RunOptions) -> Result<RunSummary> {
        let cameras = self.load_cameras(options.use_cache).await;
        if cameras.is_empty() {
            return Err(PipelineError::NoMetadata);
        }

        export::save_all(&self.config.export, &cameras).await?;

        let batch = if options.metadata_only {
            info!("Metadata only, skipping image downloads");
            None
        } else {
            Some(self.runner.run(&cameras, options.max_cameras).await)
        };

        Ok(RunSummary {
            cameras: cameras.len(),
            batch,
        })
    }

    /// Download a single camera picked by its raw id. Always bypasses the cache.
    async fn run_single(&self, camera_id: &str) -> Result<RunSummary> {
        let raw = fetch_or_empty(&self.source).await;
        if raw.is_empty() {
            return Err(PipelineError::NoMetadata);
        }

        let Some(target) = raw.iter().find(|r| raw_id_matches(r, camera_id)) else {
            error!(camera_id, "Camera not found");
            return Err(PipelineError::CameraNotFound(camera_id.to_string()));
        };

        let camera = match normalize_record(0, target) {
            Ok(camera) => camera,
            Err(e) => {
                error!(camera_id, error = %e, "Failed to normalize camera record");
                return Ok(RunSummary {
                    cameras: 0,
                    batch: None,
                });
            }
        };

        info!(camera_id, name = %camera.name, "Testing single camera");
        let batch = self.runner.run(std::slice::from_ref(&camera), Some(1)).await;

        Ok(RunSummary {
            cameras: 1,
            batch: Some(batch),
        })
    }

    async fn load_cameras(&self, use_cache: bool) -> Vec<CameraRecord> {
        if use_cache && self.config.cache.enabled {
            let cache = MetadataCache::new(self.config.cache.path.clone(), self.config.cache.max_age());
            cache.load_or_refresh(&self.source, SystemTime::now()).await
        } else {
            normalize(&fetch_or_empty(&self.source).await)
        }
    }
}

fn raw_id_matches(raw: &Value, camera_id: &str) -> bool {
    match raw.get("id") {
        Some(Value::String(s)) => s == camera_id,
        Some(Value::Number(n)) => n.to_string() == camera_id,
        _ => false,
    }
}
