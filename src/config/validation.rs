use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("metadata_url must not be empty")]
    EmptyMetadataUrl,

    #[error("Invalid URL scheme in {field} '{url}', expected 'http://' or 'https://'")]
    InvalidUrlScheme { field: String, url: String },

    #[error("Timeout must be positive: {field} = 0")]
    ZeroTimeout { field: String },

    #[error("Cache max age must be positive")]
    ZeroCacheAge,

    #[error("Schedule interval must be positive")]
    ZeroScheduleInterval,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_source(config)?;
    validate_download(config)?;
    validate_cache(config)?;
    validate_schedule(config)?;
    Ok(())
}

fn validate_source(config: &Config) -> Result<(), ValidationError> {
    let url = config.source.metadata_url.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyMetadataUrl);
    }
    check_scheme("source.metadata_url", url)?;

    if config.source.metadata_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "source.metadata_timeout_secs".to_string(),
        });
    }

    Ok(())
}

fn validate_download(config: &Config) -> Result<(), ValidationError> {
    if config.download.image_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "download.image_timeout_secs".to_string(),
        });
    }

    if !config.download.referer.is_empty() {
        check_scheme("download.referer", &config.download.referer)?;
    }

    Ok(())
}

fn validate_cache(config: &Config) -> Result<(), ValidationError> {
    if config.cache.enabled && config.cache.max_age_hours == 0 {
        return Err(ValidationError::ZeroCacheAge);
    }
    Ok(())
}

fn validate_schedule(config: &Config) -> Result<(), ValidationError> {
    if config.schedule.interval_secs == 0 {
        return Err(ValidationError::ZeroScheduleInterval);
    }
    Ok(())
}

fn check_scheme(field: &str, url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrlScheme {
            field: field.to_string(),
            url: url.to_string(),
        })
    }
}
