//! Entity category data model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::CloakError;

/// Semantic class of sensitive value handled by the engine.
///
/// Each category owns one fake value pool and one slice of the mapping
/// store. The set is closed: unknown classes coming in from configuration
/// or a classifier are rejected at the boundary rather than carried as
/// free-form strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// Company and organization names
    Company,
    /// Web addresses and domains
    Url,
    /// Personal names
    Person,
    /// Cities, regions, countries
    Location,
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
}

impl EntityCategory {
    /// All categories, in the order used for deterministic iteration.
    pub const ALL: [EntityCategory; 6] = [
        Self::Company,
        Self::Url,
        Self::Person,
        Self::Location,
        Self::Phone,
        Self::Email,
    ];

    /// Stable lowercase identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Url => "url",
            Self::Person => "person",
            Self::Location => "location",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    /// Map an external classifier label onto a category.
    ///
    /// NER models emit finer-grained labels than the engine tracks
    /// ("city" and "country" both fold into [`EntityCategory::Location`]).
    /// Returns `None` for labels with no counterpart here.
    pub fn from_classifier_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "company" | "organization" | "org" => Some(Self::Company),
            "url" | "domain" | "website" => Some(Self::Url),
            "person" | "name" => Some(Self::Person),
            "location" | "city" | "country" | "address" => Some(Self::Location),
            "phone" | "phone number" | "telephone" => Some(Self::Phone),
            "email" | "email address" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = CloakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "url" => Ok(Self::Url),
            "person" => Ok(Self::Person),
            "location" => Ok(Self::Location),
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            _ => Err(CloakError::Configuration(format!(
                "Unknown entity category: {s}. Expected one of: company, url, person, location, phone, email"
            ))),
        }
    }
}
