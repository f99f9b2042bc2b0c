//! Configuration system for addrex.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AddrexError, AddrexResult};
use crate::traits::{AnnotatorConfig, AnnotatorProvider};

/// Upper bound on the length of recognizable text, in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;

/// Main service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Accepted API keys. When empty, any non-empty key is accepted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_keys: Vec<String>,
    /// Maximum length of the `text` field in recognize requests.
    pub max_text_length: usize,
    /// Annotator configuration.
    pub annotator: AnnotatorConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_keys: Vec::new(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            annotator: AnnotatorConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AddrexResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| AddrexError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| AddrexError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| AddrexError::Configuration(e.to_string())),
            _ => Err(AddrexError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `ADDREX_CONFIG` names a config file to start from; individual
    /// `ADDREX_*` variables override it.
    pub fn from_env() -> AddrexResult<Self> {
        let mut config = match std::env::var("ADDREX_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> AddrexResult<()> {
        if let Some(host) = var("ADDREX_HOST") {
            self.host = host;
        }
        if let Some(port) = var("ADDREX_PORT") {
            self.port = port.parse().map_err(|_| {
                AddrexError::Configuration(format!("ADDREX_PORT must be a valid port number: {}", port))
            })?;
        }
        if let Some(keys) = var("ADDREX_API_KEYS") {
            self.api_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(max) = var("ADDREX_MAX_TEXT_LENGTH") {
            self.max_text_length = max.parse().map_err(|_| {
                AddrexError::Configuration(format!("ADDREX_MAX_TEXT_LENGTH must be a number: {}", max))
            })?;
        }

        // Annotator configuration
        if let Some(provider) = var("ADDREX_ANNOTATOR_PROVIDER") {
            self.annotator.provider = AnnotatorProvider::parse(&provider).ok_or_else(|| {
                AddrexError::UnsupportedProvider {
                    provider: provider.clone(),
                }
            })?;
        }
        if let Some(model) = var("ADDREX_ANNOTATOR_MODEL") {
            self.annotator.model = model;
        }
        if let Some(path) = var("ADDREX_ANNOTATOR_MODEL_PATH") {
            self.annotator.model_path = Some(PathBuf::from(path));
        }
        if let Some(url) = var("ADDREX_ANNOTATOR_URL") {
            self.annotator.base_url = Some(url);
        }
        if let Some(timeout) = var("ADDREX_ANNOTATOR_TIMEOUT_SECS") {
            self.annotator.timeout_secs = timeout.parse().map_err(|_| {
                AddrexError::Configuration(format!(
                    "ADDREX_ANNOTATOR_TIMEOUT_SECS must be a number: {}",
                    timeout
                ))
            })?;
        }
        if let Some(preload) = var("ADDREX_ANNOTATOR_PRELOAD") {
            self.annotator.preload = !matches!(preload.to_lowercase().as_str(), "0" | "false" | "no");
        }

        Ok(())
    }

    /// Check whether an API key is accepted.
    pub fn accepts_api_key(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.api_keys.is_empty() || self.api_keys.iter().any(|k| k == key)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }
}

/// Builder for ServiceConfig.
#[derive(Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Add an accepted API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_keys.push(key.into());
        self
    }

    /// Set annotator configuration.
    pub fn annotator(mut self, config: AnnotatorConfig) -> Self {
        self.config.annotator = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_text_length, 5000);
        assert_eq!(config.annotator.provider, AnnotatorProvider::Gazetteer);
        assert!(config.annotator.preload);
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[
                ("ADDREX_PORT", "9090"),
                ("ADDREX_API_KEYS", "alpha, beta,,"),
                ("ADDREX_ANNOTATOR_PROVIDER", "http"),
                ("ADDREX_ANNOTATOR_URL", "http://ner:8000"),
                ("ADDREX_ANNOTATOR_PRELOAD", "false"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.api_keys, vec!["alpha", "beta"]);
        assert_eq!(config.annotator.provider, AnnotatorProvider::Http);
        assert_eq!(config.annotator.base_url.as_deref(), Some("http://ner:8000"));
        assert!(!config.annotator.preload);
    }

    #[test]
    fn test_apply_env_rejects_bad_values() {
        let mut config = ServiceConfig::default();
        assert!(config.apply_env(env(&[("ADDREX_PORT", "eighty")])).is_err());
        assert!(matches!(
            config.apply_env(env(&[("ADDREX_ANNOTATOR_PROVIDER", "bert")])),
            Err(AddrexError::UnsupportedProvider { .. })
        ));
    }

    #[test]
    fn test_accepts_api_key() {
        let open = ServiceConfig::default();
        assert!(open.accepts_api_key("anything"));
        assert!(!open.accepts_api_key(""));

        let closed = ServiceConfig::builder().api_key("secret").build();
        assert!(closed.accepts_api_key("secret"));
        assert!(!closed.accepts_api_key("guess"));
    }

    #[test]
    fn test_from_file_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
port = 7000
[annotator]
provider = "gazetteer"
model_path = "/srv/addrex/model.json"
"#
        )
        .unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.annotator.model_path,
            Some(PathBuf::from("/srv/addrex/model.json"))
        );
        assert_eq!(config.annotator.timeout_secs, 10);
    }

    #[test]
    fn test_from_file_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            ServiceConfig::from_file(file.path()),
            Err(AddrexError::Configuration(_))
        ));
    }
}
