//! Server state management.

use std::sync::Arc;

use addrex_annotators::AnnotatorFactory;
use addrex_core::error::AddrexResult;
use addrex_core::{AddressExtractor, Annotator, AnnotatorCache, ServiceConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
    annotators: Arc<AnnotatorCache>,
}

impl AppState {
    /// Create a new application state. The annotator is built on first use
    /// unless [`preload`](Self::preload) is called.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            annotators: Arc::new(AnnotatorCache::new()),
        }
    }

    /// Create with a pre-built annotator.
    pub fn new_with_annotator(config: ServiceConfig, annotator: Arc<dyn Annotator>) -> Self {
        Self {
            config: Arc::new(config),
            annotators: Arc::new(AnnotatorCache::with_annotator(annotator)),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The annotator cache, exposed so tests can reset or inject backends.
    pub fn annotators(&self) -> &AnnotatorCache {
        &self.annotators
    }

    /// Load the annotator now, failing if the model is unavailable.
    pub async fn preload(&self) -> AddrexResult<()> {
        self.annotator().await.map(|_| ())
    }

    /// Get the shared annotator, building it on first use.
    pub async fn annotator(&self) -> AddrexResult<Arc<dyn Annotator>> {
        let config = &self.config.annotator;
        self.annotators
            .get_or_try_init(|| AnnotatorFactory::create(config))
            .await
    }

    /// Build an extractor over the shared annotator.
    pub async fn extractor(&self) -> AddrexResult<AddressExtractor> {
        Ok(AddressExtractor::new(self.annotator().await?))
    }
}
