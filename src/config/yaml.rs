//! YAML configuration parsing.
//!
//! Parses proxy configuration from YAML files.

use std::path::Path;

use super::error::ConfigError;
use super::types::ProxyConfig;

/// YAML configuration loader.
pub struct YamlLoader;

impl YamlLoader {
    /// Load proxy configuration from a file.
    pub fn load_proxy_config(path: impl AsRef<Path>) -> Result<ProxyConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ProxyConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlFileError {
                path: path.to_path_buf(),
                source,
            })?;
        Self::validate_proxy_config(&config)?;
        Ok(config)
    }

    /// Parse proxy configuration from a YAML string.
    pub fn parse_proxy_config(yaml: &str) -> Result<ProxyConfig, ConfigError> {
        let config: ProxyConfig = serde_yaml::from_str(yaml)?;
        Self::validate_proxy_config(&config)?;
        Ok(config)
    }

    /// Validate a proxy configuration.
    fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
        if config.scheduler_name.trim().is_empty() {
            return Err(ConfigError::MissingField("scheduler_name".into()));
        }

        if config.endpoint.host.trim().is_empty() {
            return Err(ConfigError::MissingField("endpoint.host".into()));
        }

        if config.endpoint.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "endpoint.port cannot be zero".into(),
            ));
        }

        if config
            .endpoint
            .binding_name
            .as_deref()
            .is_some_and(|b| b.trim().is_empty())
        {
            return Err(ConfigError::InvalidConfig(
                "endpoint.binding_name cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PORT;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_proxy_yaml() {
        let yaml = r#"
scheduler_name: reporting
endpoint:
  host: sched.internal
"#;

        let config = YamlLoader::parse_proxy_config(yaml).unwrap();
        assert_eq!(config.scheduler_name, "reporting");
        assert_eq!(config.endpoint.host, "sched.internal");
        assert_eq!(config.endpoint.port, DEFAULT_PORT);
        assert!(config.endpoint.binding_name.is_none());
    }

    #[test]
    fn test_parse_proxy_with_all_fields() {
        let yaml = r#"
scheduler_name: reporting
endpoint:
  host: 10.0.0.5
  port: 2099
  binding_name: reporting-engine
"#;

        let config = YamlLoader::parse_proxy_config(yaml).unwrap();
        assert_eq!(config.endpoint.port, 2099);
        assert_eq!(config.address(), "10.0.0.5:2099/reporting-engine");
    }

    #[test]
    fn test_validation_error_missing_name() {
        let yaml = r#"
scheduler_name: ""
endpoint:
  host: localhost
"#;

        let result = YamlLoader::parse_proxy_config(yaml);
        assert!(matches!(result, Err(ConfigError::MissingField(f)) if f == "scheduler_name"));
    }

    #[test]
    fn test_validation_error_zero_port() {
        let yaml = r#"
scheduler_name: reporting
endpoint:
  host: localhost
  port: 0
"#;

        let result = YamlLoader::parse_proxy_config(yaml);
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_error_empty_binding() {
        let yaml = r#"
scheduler_name: reporting
endpoint:
  host: localhost
  binding_name: " "
"#;

        let result = YamlLoader::parse_proxy_config(yaml);
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = YamlLoader::parse_proxy_config("scheduler_name: [unclosed");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "scheduler_name: billing").unwrap();
        writeln!(file, "endpoint:").unwrap();
        writeln!(file, "  host: billing.internal").unwrap();
        writeln!(file, "  port: 1199").unwrap();

        let config = YamlLoader::load_proxy_config(file.path()).unwrap();
        assert_eq!(config.address(), "billing.internal:1199/billing");
    }

    #[test]
    fn test_load_missing_file() {
        let result = YamlLoader::load_proxy_config("/nonexistent/proxy.yaml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }
}
