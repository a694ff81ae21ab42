//! One-off geolocation lookup command.

use console::style;

use crate::config::Settings;
use crate::geoip::ipapi::IpApiClient;

/// Resolve the country for an IP address and print the result.
pub async fn cmd_lookup(settings: &Settings, ip: &str) -> anyhow::Result<()> {
    let client = IpApiClient::with_base_url(&settings.ipapi_url, &settings.ipapi_key);

    match client.lookup(ip).await {
        Ok(result) => {
            println!(
                "{} {} -> {} ({})",
                style("✓").green(),
                result.ip,
                result.country_name,
                result.country_code
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} lookup failed for {}: {}", style("✗").red(), ip, e);
            Err(e.into())
        }
    }
}
