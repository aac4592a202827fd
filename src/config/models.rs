use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Upstream camera list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            metadata_url: default_metadata_url(),
            metadata_timeout_secs: default_metadata_timeout_secs(),
        }
    }
}

impl SourceConfig {
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}

fn default_metadata_url() -> String {
    "https://datos.vigo.org/data/trafico/camaras-trafico.json".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    10
}

/// Image download settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    /// Pause between two consecutive image requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Bodies shorter than this are rejected
    #[serde(default = "default_min_image_bytes")]
    pub min_image_bytes: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// The camera portal refuses image requests without it
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            image_timeout_secs: default_image_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            min_image_bytes: default_min_image_bytes(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            referer: default_referer(),
        }
    }
}

impl DownloadConfig {
    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Header set sent with every image request
    pub fn image_headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), self.accept.clone()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
            ("Referer".to_string(), self.referer.clone()),
        ]
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./imagenes_vigo")
}

fn default_image_timeout_secs() -> u64 {
    15
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_min_image_bytes() -> usize {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_accept() -> String {
    "image/webp,image/apng,image/*,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "es-ES,es;q=0.9,en;q=0.8".to_string()
}

fn default_referer() -> String {
    "https://hoxe.vigo.org/".to_string()
}

/// On-disk metadata cache
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_cache_path(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours * 3600)
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("camaras_cache.json")
}

fn default_max_age_hours() -> u64 {
    24
}

/// Metadata exports
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
            csv_path: default_csv_path(),
        }
    }
}

fn default_json_path() -> PathBuf {
    PathBuf::from("camaras.json")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("camaras.csv")
}

/// Repeated runs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    pub max_iterations: Option<u32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            duration_secs: default_duration_secs(),
            max_iterations: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    180
}

fn default_duration_secs() -> u64 {
    3600
}
