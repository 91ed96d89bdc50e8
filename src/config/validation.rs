use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("api.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("api.base_url must use http or https, got '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_base_url(&config.api.base_url)?;

    if config.api.poll_interval_ms == 0 {
        return Err(ValidationError::NonPositive {
            field: "api.poll_interval_ms",
        });
    }

    if config.api.connect_timeout_secs == 0 {
        return Err(ValidationError::NonPositive {
            field: "api.connect_timeout_secs",
        });
    }

    Ok(())
}

fn validate_base_url(raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}
