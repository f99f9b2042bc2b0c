//! Text-to-address extraction.
//!
//! The extractor seeds a result from the caller's known fields, runs the
//! annotator over the text and fills the remaining `name`, `company` and
//! `city_locality` fields from the first qualifying entity of each kind.
//! Every other field is only ever populated by seeding.

use std::sync::Arc;

use tracing::debug;

use crate::error::AddrexResult;
use crate::traits::Annotator;
use crate::types::{AnnotatedEntity, EntityCategory, ExtractedAddress, PartialAddress};

/// Address extraction engine.
#[derive(Clone)]
pub struct AddressExtractor {
    annotator: Arc<dyn Annotator>,
}

impl AddressExtractor {
    /// Create a new extractor over a shared annotator.
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self { annotator }
    }

    /// Name of the underlying annotator model.
    pub fn model_name(&self) -> &str {
        self.annotator.model_name()
    }

    /// Extract a structured address from free text.
    ///
    /// Fields present in `known` are copied unchanged and never overwritten.
    /// Text with no non-blank lines returns the seeded result without
    /// calling the annotator.
    pub async fn extract(
        &self,
        text: &str,
        known: Option<&PartialAddress>,
    ) -> AddrexResult<ExtractedAddress> {
        let mut result = ExtractedAddress::seeded(known);

        let text = text.trim();
        if normalize_lines(text).is_empty() {
            debug!("No non-empty lines, skipping annotation");
            return Ok(result);
        }

        // The annotator sees the whole text; lines only gate the call.
        let entities = self.annotator.annotate(text).await?;
        debug!(
            model = self.annotator.model_name(),
            entities = entities.len(),
            "Annotated text"
        );

        merge_entities(&mut result, &entities);
        Ok(result)
    }
}

/// Split text into trimmed, non-empty lines.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Fill unset fields from entities, first match wins per field.
pub fn merge_entities(result: &mut ExtractedAddress, entities: &[AnnotatedEntity]) {
    for entity in entities {
        let span = entity.text.trim();
        // A blank span still claims the field.
        match entity.category {
            EntityCategory::PersonName => fill(&mut result.name, span),
            EntityCategory::Organization => fill(&mut result.company, span),
            // Multi-word places are usually states or countries.
            EntityCategory::GeopoliticalPlace if span.split_whitespace().count() == 1 => {
                fill(&mut result.city_locality, span)
            }
            _ => {}
        }
    }
}

fn fill(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}
