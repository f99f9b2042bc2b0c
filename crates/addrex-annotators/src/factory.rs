//! Factory for creating annotator providers.

use std::sync::Arc;

use addrex_core::error::{AddrexError, AddrexResult};
use addrex_core::traits::{Annotator, AnnotatorConfig, AnnotatorProvider};

/// Factory for creating annotator providers.
pub struct AnnotatorFactory;

impl AnnotatorFactory {
    /// Create an annotator from the given configuration.
    ///
    /// This loads the model (or checks the remote service), so call it once
    /// and share the result, typically through an
    /// [`AnnotatorCache`](addrex_core::AnnotatorCache).
    pub async fn create(config: &AnnotatorConfig) -> AddrexResult<Arc<dyn Annotator>> {
        match config.provider {
            #[cfg(feature = "gazetteer")]
            AnnotatorProvider::Gazetteer => {
                let path = config.resolved_model_path();
                let annotator = crate::gazetteer::GazetteerAnnotator::load(path, &config.model).await?;
                Ok(Arc::new(annotator))
            }

            #[cfg(feature = "http")]
            AnnotatorProvider::Http => {
                let annotator = crate::http::HttpAnnotator::connect(config).await?;
                Ok(Arc::new(annotator))
            }

            #[allow(unreachable_patterns)]
            _ => Err(AddrexError::UnsupportedProvider {
                provider: format!("{:?}", config.provider),
            }),
        }
    }
}
