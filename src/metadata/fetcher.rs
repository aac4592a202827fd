use crate::config::SourceConfig;
use crate::http::{FetchError, HttpClient, HttpConfig};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MetadataFetchError {
    #[error("metadata request failed: {0}")]
    Http(#[from] FetchError),

    #[error("metadata body is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MetadataFetchError>;

/// Where the raw camera list comes from
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Retrieve the raw, untyped camera list
    async fn fetch_camera_list(&self) -> Result<Vec<Value>>;
}

/// Camera list published as a JSON array over HTTP
#[derive(Debug, Clone)]
pub struct HttpMetadataSource {
    client: HttpClient,
    url: String,
}

impl HttpMetadataSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::new(HttpConfig {
            timeout,
            headers: vec![("Accept".to_string(), "application/json".to_string())],
        })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(config.metadata_url.clone(), config.metadata_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch_camera_list(&self) -> Result<Vec<Value>> {
        info!(url = %self.url, "Fetching camera list");

        let body = self.client.get_bytes(&self.url).await?;
        let cameras: Vec<Value> = serde_json::from_slice(&body)?;

        info!(count = cameras.len(), "Camera list received");
        Ok(cameras)
    }
}

/// Fetch the camera list, treating any failure as "no data".
pub async fn fetch_or_empty<S>(source: &S) -> Vec<Value>
where
    S: MetadataSource + ?Sized,
{
    match source.fetch_camera_list().await {
        Ok(cameras) => cameras,
        Err(e) => {
            error!(error = %e, "Failed to fetch camera list");
            Vec::new()
        }
    }
}
