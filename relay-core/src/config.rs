use config::{Config, File};
use serde::Deserialize;

use crate::error::RelayError;

/// Environment variable that supplies the external endpoint URL.
pub const ENDPOINT_ENV_VAR: &str = "GOOGLE_CLOUD_FUNCTION_URL";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RelayConfig {
    pub http: HttpConfig,
    pub relay: ForwardConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ForwardConfig {
    pub endpoint_url: Option<String>,
    /// Unset means the transport default (no overall request timeout).
    pub timeout_seconds: Option<u64>,
}

impl ForwardConfig {
    /// The configured endpoint, if present and non-blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl RelayConfig {
    /// Load from an optional TOML file, then apply the endpoint env override.
    pub fn load(path: &str) -> Result<Self, RelayError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        let config: Self = s.try_deserialize()?;
        Ok(config.with_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok()))
    }

    /// Replace the endpoint when `value` is present and non-blank.
    pub fn with_endpoint_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.relay.endpoint_url = Some(url);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_toml(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("relay-config-{}.toml", uuid::Uuid::new_v4()));
        let mut f = std::fs::File::create(&path).expect("create temp config");
        f.write_all(contents.as_bytes()).expect("write temp config");
        path
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert!(config.relay.endpoint().is_none());
        assert!(config.relay.timeout_seconds.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp_toml(
            r#"
[http]
port = 9090

[relay]
endpoint_url = "https://example.test/fn"
timeout_seconds = 15
"#,
        );
        let config = RelayConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.http.port, 9090);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.relay.timeout_seconds, Some(15));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join(format!("relay-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = RelayConfig::load(path.to_str().unwrap());
        assert!(config.is_ok());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let path = write_temp_toml("[http]\nport = \"not a port\"\n");
        let err = RelayConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)), "got {err:?}");
        assert!(err.to_string().starts_with("Config error:"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_blank_endpoint_counts_as_absent() {
        let config = ForwardConfig {
            endpoint_url: Some("   ".to_string()),
            timeout_seconds: None,
        };
        assert!(config.endpoint().is_none());
    }

    #[test]
    fn test_endpoint_override() {
        let config = RelayConfig::default()
            .with_endpoint_override(Some("https://override.test".to_string()));
        assert_eq!(config.relay.endpoint(), Some("https://override.test"));

        let kept = config.clone().with_endpoint_override(Some(String::new()));
        assert_eq!(kept.relay.endpoint(), Some("https://override.test"));

        let kept = config.with_endpoint_override(None);
        assert_eq!(kept.relay.endpoint(), Some("https://override.test"));
    }
}
