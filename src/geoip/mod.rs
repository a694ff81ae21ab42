//! IP geolocation collaborator.
//!
//! The access-control gate resolves a caller's IP to a country name
//! through the [`GeoLocator`] trait and checks it against the
//! immutable [`AllowedCountries`] set loaded at startup.

pub mod ipapi;

pub use ipapi::IpApiClient;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// Failure while resolving an IP to a country.
#[derive(Debug, Error)]
pub enum GeoIpError {
    #[error("error querying geolocation service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geolocation service returned status {0}")]
    BadStatus(u16),
}

/// Resolves an IP address to a country name.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up the country name for `ip`. A failed lookup is an error;
    /// it never defaults to an allow or deny answer.
    async fn country_for_ip(&self, ip: &str) -> Result<String, GeoIpError>;
}

/// Immutable set of country names allowed to perform mutating calls.
/// Membership is a case-sensitive exact match.
#[derive(Debug, Clone, Default)]
pub struct AllowedCountries {
    countries: HashSet<String>,
}

impl AllowedCountries {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
