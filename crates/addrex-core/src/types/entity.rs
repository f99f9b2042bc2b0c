//! Named-entity annotation types.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Category tag attached to an annotated span.
///
/// Only [`PersonName`](Self::PersonName), [`Organization`](Self::Organization)
/// and [`GeopoliticalPlace`](Self::GeopoliticalPlace) feed the address merge;
/// the rest are carried so backends can report everything they find.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// A person (e.g., "John Doe").
    PersonName,
    /// A company, agency or institution (e.g., "Acme Inc.").
    Organization,
    /// A country, state or city (e.g., "Austin", "Texas").
    GeopoliticalPlace,
    /// A non-political location (e.g., "Lake Travis").
    Location,
    /// A building, airport or similar (e.g., "Terminal 4").
    Facility,
    /// A date or period.
    Date,
    /// A bare number.
    Cardinal,
    /// Anything else the backend emits.
    Other,
}

impl EntityCategory {
    /// Map a backend label to a category.
    ///
    /// Handles the common label sets (OntoNotes `PERSON`/`ORG`/`GPE`, CoNLL
    /// `PER`/`ORG`/`LOC`) in any case. Unknown labels map to
    /// [`Other`](Self::Other).
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();

        match normalized.as_str() {
            "person" | "per" | "person_name" | "person-name" | "name" => Self::PersonName,
            "org" | "organization" | "organisation" | "company" => Self::Organization,
            "gpe" | "geopolitical_place" | "geopolitical-place" | "city" | "country"
            | "state" => Self::GeopoliticalPlace,
            "loc" | "location" => Self::Location,
            "fac" | "facility" => Self::Facility,
            "date" | "time" => Self::Date,
            "cardinal" | "quantity" => Self::Cardinal,
            _ => Self::Other,
        }
    }
}

/// A span recognized by an annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedEntity {
    /// The matched substring.
    pub text: String,
    /// The category tag.
    pub category: EntityCategory,
    /// Position of the span in the annotated text, when the backend knows it.
    /// The gazetteer reports byte offsets; remote backends may report
    /// character offsets. Only used for ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
}

impl AnnotatedEntity {
    /// Create a new entity without position information.
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
            start: None,
        }
    }

    /// Attach the position of the span.
    pub fn at(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }
}
