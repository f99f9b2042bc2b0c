//! Annotator trait and related types.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AddrexResult;
use crate::types::AnnotatedEntity;

/// Core Annotator trait - all named-entity backends implement this.
///
/// Implementations must return entities in left-to-right order of
/// appearance in `text`; the address merge relies on it.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Annotate text with categorized entity spans.
    async fn annotate(&self, text: &str) -> AddrexResult<Vec<AnnotatedEntity>>;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

/// Annotator provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnotatorProvider {
    /// Lexicon model loaded from disk.
    #[default]
    Gazetteer,
    /// Remote NER service over HTTP.
    Http,
}

impl AnnotatorProvider {
    /// Parse a provider name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gazetteer" | "lexicon" => Some(Self::Gazetteer),
            "http" | "remote" | "spacy" => Some(Self::Http),
            _ => None,
        }
    }
}

/// Annotator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Provider type.
    pub provider: AnnotatorProvider,
    /// Model name/identifier.
    pub model: String,
    /// Model file for the gazetteer backend. Defaults to
    /// `~/.addrex/models/<model>.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    /// Base URL for the HTTP backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout for the HTTP backend, in seconds.
    pub timeout_secs: u64,
    /// Load the annotator at startup instead of on first request.
    pub preload: bool,
}

pub const DEFAULT_MODEL: &str = "en_address_gazetteer";

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            provider: AnnotatorProvider::Gazetteer,
            model: DEFAULT_MODEL.to_string(),
            model_path: None,
            base_url: None,
            timeout_secs: 10,
            preload: true,
        }
    }
}

impl AnnotatorConfig {
    /// Resolve the model file for the gazetteer backend.
    pub fn resolved_model_path(&self) -> PathBuf {
        if let Some(ref path) = self.model_path {
            return path.clone();
        }
        dirs::home_dir()
            .map(|h| h.join(".addrex"))
            .unwrap_or_else(|| PathBuf::from(".addrex"))
            .join("models")
            .join(format!("{}.json", self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!(AnnotatorProvider::parse("HTTP"), Some(AnnotatorProvider::Http));
        assert_eq!(AnnotatorProvider::parse("spacy"), Some(AnnotatorProvider::Http));
        assert_eq!(
            AnnotatorProvider::parse("gazetteer"),
            Some(AnnotatorProvider::Gazetteer)
        );
        assert_eq!(AnnotatorProvider::parse("bert"), None);
    }

    #[test]
    fn test_resolved_model_path() {
        let config = AnnotatorConfig::default();
        assert!(config
            .resolved_model_path()
            .ends_with("models/en_address_gazetteer.json"));

        let config = AnnotatorConfig {
            model_path: Some(PathBuf::from("/srv/model.toml")),
            ..Default::default()
        };
        assert_eq!(config.resolved_model_path(), PathBuf::from("/srv/model.toml"));
    }
}
