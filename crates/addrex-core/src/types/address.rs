//! Postal address records.
//!
//! [`PartialAddress`] is what a caller already knows; [`ExtractedAddress`] is
//! what the engine returns. Both carry the same ten optional fields, named by
//! [`AddressField`]. A field that is `None` is absent, which is not the same
//! as a field holding an empty string.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::{AddrexError, AddrexResult};

/// The recognized address fields.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Name,
    Company,
    Phone,
    #[strum(serialize = "address_line1")]
    #[serde(rename = "address_line1")]
    AddressLine1,
    #[strum(serialize = "address_line2")]
    #[serde(rename = "address_line2")]
    AddressLine2,
    #[strum(serialize = "address_line3")]
    #[serde(rename = "address_line3")]
    AddressLine3,
    CityLocality,
    StateProvince,
    PostalCode,
    CountryCode,
}

impl AddressField {
    /// Maximum accepted length (in characters) of a caller-supplied value.
    pub fn max_length(&self) -> usize {
        match self {
            Self::Name | Self::Company | Self::CityLocality => 100,
            Self::Phone | Self::PostalCode => 20,
            Self::AddressLine1 | Self::AddressLine2 | Self::AddressLine3 => 200,
            Self::StateProvince => 50,
            Self::CountryCode => 2,
        }
    }

    /// All fields in declaration order.
    pub fn all() -> Vec<AddressField> {
        Self::iter().collect()
    }
}

/// Address fields already known by the caller.
///
/// Present fields are authoritative: extraction never overwrites them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialAddress {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city_locality: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

impl PartialAddress {
    /// Get the value of a field, if present.
    pub fn get(&self, field: AddressField) -> Option<&str> {
        let value = match field {
            AddressField::Name => &self.name,
            AddressField::Company => &self.company,
            AddressField::Phone => &self.phone,
            AddressField::AddressLine1 => &self.address_line1,
            AddressField::AddressLine2 => &self.address_line2,
            AddressField::AddressLine3 => &self.address_line3,
            AddressField::CityLocality => &self.city_locality,
            AddressField::StateProvince => &self.state_province,
            AddressField::PostalCode => &self.postal_code,
            AddressField::CountryCode => &self.country_code,
        };
        value.as_deref()
    }

    /// Builder-style setter, mostly for tests and clients.
    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        let slot = match field {
            AddressField::Name => &mut self.name,
            AddressField::Company => &mut self.company,
            AddressField::Phone => &mut self.phone,
            AddressField::AddressLine1 => &mut self.address_line1,
            AddressField::AddressLine2 => &mut self.address_line2,
            AddressField::AddressLine3 => &mut self.address_line3,
            AddressField::CityLocality => &mut self.city_locality,
            AddressField::StateProvince => &mut self.state_province,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::CountryCode => &mut self.country_code,
        };
        *slot = Some(value.into());
        self
    }

    /// Number of fields the caller supplied.
    pub fn present_count(&self) -> usize {
        AddressField::iter()
            .filter(|f| self.get(*f).is_some())
            .count()
    }

    /// Check per-field length limits.
    pub fn validate(&self) -> AddrexResult<()> {
        for field in AddressField::iter() {
            if let Some(value) = self.get(field) {
                if value.chars().count() > field.max_length() {
                    return Err(AddrexError::too_long(
                        format!("address.{}", field),
                        field.max_length(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Result of address recognition.
///
/// Absent fields are left out of the serialized JSON rather than written as
/// `null`. Clients that expect every key should treat a missing key as
/// `null`; deserializing accepts either form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl ExtractedAddress {
    /// Seed a result with every field the caller supplied.
    pub fn seeded(known: Option<&PartialAddress>) -> Self {
        match known {
            Some(known) => Self::from(known.clone()),
            None => Self::default(),
        }
    }

    /// Get the value of a field, if filled.
    pub fn get(&self, field: AddressField) -> Option<&str> {
        let value = match field {
            AddressField::Name => &self.name,
            AddressField::Company => &self.company,
            AddressField::Phone => &self.phone,
            AddressField::AddressLine1 => &self.address_line1,
            AddressField::AddressLine2 => &self.address_line2,
            AddressField::AddressLine3 => &self.address_line3,
            AddressField::CityLocality => &self.city_locality,
            AddressField::StateProvince => &self.state_province,
            AddressField::PostalCode => &self.postal_code,
            AddressField::CountryCode => &self.country_code,
        };
        value.as_deref()
    }

    /// Check if no field is filled.
    pub fn is_empty(&self) -> bool {
        AddressField::iter().all(|f| self.get(f).is_none())
    }
}

impl From<PartialAddress> for ExtractedAddress {
    fn from(p: PartialAddress) -> Self {
        Self {
            name: p.name,
            company: p.company,
            phone: p.phone,
            address_line1: p.address_line1,
            address_line2: p.address_line2,
            address_line3: p.address_line3,
            city_locality: p.city_locality,
            state_province: p.state_province,
            postal_code: p.postal_code,
            country_code: p.country_code,
        }
    }
}
