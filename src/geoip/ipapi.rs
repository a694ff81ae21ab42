//! ipapi.com lookup client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeoIpError, GeoLocator};

const DEFAULT_BASE_URL: &str = "http://api.ipapi.com";

/// One lookup response from ipapi.com.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResult {
    pub ip: String,
    #[serde(rename = "type")]
    pub ip_type: String,
    pub country_code: String,
    pub country_name: String,
}

/// HTTP client for the ipapi.com geolocation service.
pub struct IpApiClient {
    base_url: String,
    access_key: String,
    client: reqwest::Client,
}

impl IpApiClient {
    /// Create a client against the public ipapi.com endpoint.
    pub fn new(access_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, access_key)
    }

    /// Create a client against a custom endpoint (used by tests and
    /// self-hosted mirrors).
    pub fn with_base_url(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            client,
        }
    }

    /// Perform a raw lookup, returning the full decoded response.
    pub async fn lookup(&self, ip: &str) -> Result<LookupResult, GeoIpError> {
        let url = format!(
            "{}/{}?access_key={}&format=1",
            self.base_url, ip, self.access_key
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoIpError::BadStatus(status.as_u16()));
        }
        Ok(response.json::<LookupResult>().await?)
    }
}

#[async_trait]
impl GeoLocator for IpApiClient {
    async fn country_for_ip(&self, ip: &str) -> Result<String, GeoIpError> {
        let result = self.lookup(ip).await?;
        Ok(result.country_name)
    }
}
