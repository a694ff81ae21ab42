//! Company record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored company record.
///
/// The ID is assigned by the service on creation and never changes.
/// `updated_at` stays unset until the first successful update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The full set of business fields, as required on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

/// A partial patch over the business fields. Fields left as `None`
/// stay untouched downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl CompanyPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.country.is_none()
            && self.website.is_none()
            && self.phone.is_none()
    }
}

/// Exact-match search predicates over the business fields. Absent
/// predicates impose no constraint; supplied predicates are ANDed.
pub type SearchFilters = CompanyPatch;

impl Company {
    /// Apply a patch in place, leaving absent fields untouched.
    pub fn apply_patch(&mut self, patch: &CompanyPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(code) = &patch.code {
            self.code = code.clone();
        }
        if let Some(country) = &patch.country {
            self.country = country.clone();
        }
        if let Some(website) = &patch.website {
            self.website = website.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
    }

    /// True when every supplied filter matches this record exactly.
    pub fn matches(&self, filters: &SearchFilters) -> bool {
        filters.name.as_deref().is_none_or(|v| v == self.name)
            && filters.code.as_deref().is_none_or(|v| v == self.code)
            && filters.country.as_deref().is_none_or(|v| v == self.country)
            && filters.website.as_deref().is_none_or(|v| v == self.website)
            && filters.phone.as_deref().is_none_or(|v| v == self.phone)
    }
}
