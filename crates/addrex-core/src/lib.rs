//! addrex-core - Core library for addrex.
//!
//! This crate provides the address types, the annotator trait and cache,
//! and the extraction engine that turns free text into a structured postal
//! address.
//!
//! # Example
//!
//! ```ignore
//! use addrex_core::{AddressExtractor, PartialAddress};
//!
//! let extractor = AddressExtractor::new(annotator);
//! let known = PartialAddress { country_code: Some("US".into()), ..Default::default() };
//!
//! let address = extractor
//!     .extract("John Doe\n123 Main St\nAustin, TX 78701", Some(&known))
//!     .await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cache::AnnotatorCache;
pub use config::ServiceConfig;
pub use error::{AddrexError, AddrexResult, ErrorCode};
pub use extractor::AddressExtractor;
pub use traits::{Annotator, AnnotatorConfig, AnnotatorProvider};
pub use types::{AddressField, AnnotatedEntity, EntityCategory, ExtractedAddress, PartialAddress};
