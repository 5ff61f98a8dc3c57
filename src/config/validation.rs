//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Origin and relay must be absolute http(s) URLs
//! - Addresses must parse; user agent must be a valid header value
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InterceptorConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::InterceptorConfig;

/// One semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_http_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) -> Option<Url> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(url),
        Ok(url) => {
            errors.push(ValidationError::new(
                field,
                format!("'{}' must be an absolute http(s) URL (scheme {})", value, url.scheme()),
            ));
            None
        }
        Err(e) => {
            errors.push(ValidationError::new(field, format!("'{}': {}", value, e)));
            None
        }
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &InterceptorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(origin) = check_http_url("origin.base_url", &config.origin.base_url, &mut errors) {
        if origin.path() != "/" || origin.query().is_some() {
            errors.push(ValidationError::new(
                "origin.base_url",
                "must be a bare origin without path or query",
            ));
        }
    }

    check_http_url("relay.endpoint", &config.relay.endpoint, &mut errors);

    if HeaderValue::from_str(&config.relay.user_agent).is_err() {
        errors.push(ValidationError::new("relay.user_agent", "not a valid header value"));
    }

    if config.gateway.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "gateway.bind_address",
            format!("'{}' is not a socket address", config.gateway.bind_address),
        ));
    }

    if config.gateway.max_body_size == 0 {
        errors.push(ValidationError::new("gateway.max_body_size", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&InterceptorConfig::default()).is_ok());
    }

    #[test]
    fn test_origin_must_be_bare() {
        let mut config = InterceptorConfig::default();
        config.origin.base_url = "https://catalog.example/api".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "origin.base_url");

        config.origin.base_url = "ftp://catalog.example".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = InterceptorConfig::default();
        config.observability.metrics_address = "garbage".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_bad_user_agent() {
        let mut config = InterceptorConfig::default();
        config.relay.user_agent = "line\nbreak".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "relay.user_agent");
    }
}
