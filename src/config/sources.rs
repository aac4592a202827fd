use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "VIGOCAM_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/vigocam.toml";
const ENV_PREFIX: &str = "VIGOCAM";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // VIGOCAM__DOWNLOAD__OUTPUT_DIR -> download.output_dir
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.download.image_timeout_secs, 15);
        assert_eq!(config.cache.max_age_hours, 24);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[source]
metadata_url = "http://localhost:9000/camaras.json"
metadata_timeout_secs = 3

[download]
output_dir = "/tmp/cams"
request_delay_ms = 0

[cache]
enabled = false
path = "/tmp/cache.json"

[schedule]
interval_secs = 60
duration_secs = 600
max_iterations = 4
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.source.metadata_url, "http://localhost:9000/camaras.json");
        assert_eq!(config.source.metadata_timeout_secs, 3);
        assert_eq!(config.download.output_dir, PathBuf::from("/tmp/cams"));
        assert_eq!(config.download.request_delay_ms, 0);
        assert_eq!(config.download.referer, "https://hoxe.vigo.org/");
        assert!(!config.cache.enabled);
        assert_eq!(config.schedule.max_iterations, Some(4));
    }
}
