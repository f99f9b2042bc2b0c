//! addrex-annotators - Named-entity annotator backends for addrex.
//!
//! # Supported Backends
//!
//! - **Gazetteer** (feature: `gazetteer`) - lexicon model loaded from disk
//! - **HTTP** (feature: `http`) - remote NER service (e.g. spaCy behind a web app)
//!
//! # Example
//!
//! ```ignore
//! use addrex_annotators::AnnotatorFactory;
//! use addrex_core::{AddressExtractor, AnnotatorConfig};
//!
//! let annotator = AnnotatorFactory::create(&AnnotatorConfig::default()).await?;
//! let extractor = AddressExtractor::new(annotator);
//! ```

mod factory;

#[cfg(feature = "gazetteer")]
mod gazetteer;

#[cfg(feature = "http")]
mod http;

pub use factory::AnnotatorFactory;

#[cfg(feature = "gazetteer")]
pub use gazetteer::{GazetteerAnnotator, GazetteerModel, GazetteerPhrase};

#[cfg(feature = "http")]
pub use http::HttpAnnotator;

// Re-export core types
pub use addrex_core::traits::{Annotator, AnnotatorConfig, AnnotatorProvider};
