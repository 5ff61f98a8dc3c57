//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::InterceptorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    /// A single value could not be converted at use time.
    #[error("Invalid value: {0}")]
    Value(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<InterceptorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<InterceptorConfig, ConfigError> {
    let config: InterceptorConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
}

/// Read the file (or start from defaults), apply overrides, then validate
/// the result as a whole.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<InterceptorConfig, ConfigError> {
    let mut config: InterceptorConfig = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => InterceptorConfig::default(),
    };

    if let Some(bind_address) = overrides.bind_address {
        config.gateway.bind_address = bind_address;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.origin.base_url, "https://anilibria.top");
        assert_eq!(config.relay.endpoint, "https://api.allorigins.win/get?url=");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[origin]
base_url = "https://catalog.example"

[gateway]
bind_address = "127.0.0.1:18080"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.origin.base_url, "https://catalog.example");
        assert_eq!(config.gateway.bind_address, "127.0.0.1:18080");
        assert_eq!(config.gateway.max_body_size, 2 * 1024 * 1024);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[origin\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = parse_config(
            r#"
[origin]
base_url = "not a url"

[gateway]
bind_address = "nowhere"
"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bind_override_is_validated() {
        let err = resolve_config(
            None,
            ConfigOverrides {
                bind_address: Some("localhost-ish".into()),
            },
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "gateway.bind_address");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bind_override_replaces_file_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nbind_address = \"127.0.0.1:18080\"").unwrap();

        let config = resolve_config(
            Some(file.path()),
            ConfigOverrides {
                bind_address: Some("0.0.0.0:9000".into()),
            },
        )
        .unwrap();
        assert_eq!(config.gateway.bind_address, "0.0.0.0:9000");

        let config = resolve_config(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config.gateway.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
