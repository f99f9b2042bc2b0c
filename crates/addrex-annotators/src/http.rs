//! Remote NER service annotator.
//!
//! Talks to an HTTP service wrapping an NLP pipeline (for example a spaCy
//! model behind a small web app):
//!
//! - `GET  {base_url}/health` must answer 2xx once the model is loaded,
//! - `POST {base_url}/ner` with `{"text": ..., "model": ...}` returns
//!   `{"entities": [{"text": ..., "label": ..., "start": ...}]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use addrex_core::error::{AddrexError, AddrexResult, ErrorCode};
use addrex_core::traits::{Annotator, AnnotatorConfig};
use addrex_core::types::{AnnotatedEntity, EntityCategory};

/// Remote NER annotator.
pub struct HttpAnnotator {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    #[serde(default)]
    entities: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    text: Option<String>,
    #[serde(alias = "label_", alias = "type", alias = "entity_group")]
    label: Option<String>,
    #[serde(alias = "start_char")]
    start: Option<usize>,
}

impl HttpAnnotator {
    /// Create a new HTTP annotator without contacting the service.
    pub fn new(config: &AnnotatorConfig) -> AddrexResult<Self> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            AddrexError::Configuration(
                "HTTP annotator requires a base URL. Set ADDREX_ANNOTATOR_URL or annotator.base_url."
                    .to_string(),
            )
        })?;

        let url = url::Url::parse(&base_url).map_err(|e| {
            AddrexError::Configuration(format!("Invalid annotator URL '{}': {}", base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AddrexError::Configuration(format!(
                "Annotator URL must be http or https: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AddrexError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create the annotator and check that the service has its model loaded.
    ///
    /// An unreachable service is reported as a configuration error so it
    /// fails at startup rather than on every request.
    pub async fn connect(config: &AnnotatorConfig) -> AddrexResult<Self> {
        let annotator = Self::new(config)?;
        annotator.probe().await?;
        Ok(annotator)
    }

    async fn probe(&self) -> AddrexResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AddrexError::Configuration(format!(
                "Annotator service at {} is unavailable: {}. Start the NER service with model '{}' loaded.",
                self.base_url, e, self.model
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AddrexError::model_missing(
                &self.model,
                &self.base_url,
                &format!("Service answered HTTP {}: {}", status, body),
            ));
        }
        Ok(())
    }

    fn convert(raw: NerResponse) -> Vec<AnnotatedEntity> {
        let mut entities: Vec<AnnotatedEntity> = raw
            .entities
            .into_iter()
            .filter_map(|e| {
                let text = e.text?;
                let category = e
                    .label
                    .as_deref()
                    .map(EntityCategory::from_label)
                    .unwrap_or(EntityCategory::Other);
                let entity = AnnotatedEntity::new(text, category);
                Some(match e.start {
                    Some(start) => entity.at(start),
                    None => entity,
                })
            })
            .collect();

        // Stable: entities without offsets keep the service's order.
        if entities.iter().all(|e| e.start.is_some()) {
            entities.sort_by_key(|e| e.start);
        }
        entities
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(&self, text: &str) -> AddrexResult<Vec<AnnotatedEntity>> {
        let request = NerRequest {
            text,
            model: &self.model,
        };

        let response = self
            .client
            .post(format!("{}/ner", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_timeout() {
                    ErrorCode::NetTimeout
                } else {
                    ErrorCode::NetConnectionFailed
                };
                AddrexError::Network {
                    message: format!("Failed to call annotator service: {}", e),
                    code,
                    source: Some(Box::new(e)),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Annotator service returned an error");
            return Err(AddrexError::from_http_status(status, &body));
        }

        let raw: NerResponse = response.json().await.map_err(|e| AddrexError::Annotator {
            message: format!("Failed to parse annotator response: {}", e),
            code: ErrorCode::AnnInvalidResponse,
            source: Some(Box::new(e)),
        })?;

        let entities = Self::convert(raw);
        debug!(model = %self.model, entities = entities.len(), "Remote annotation");
        Ok(entities)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
