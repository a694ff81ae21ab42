//! Web server command.

use console::style;

use crate::config::Settings;
use crate::server::AppState;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    if settings.ipapi_key.is_empty() {
        eprintln!(
            "  {} No ipapi access key configured; geolocation lookups will fail",
            style("!").yellow(),
        );
    }
    if settings.allowed_countries.is_empty() {
        eprintln!(
            "  {} No allowed countries configured; all writes will be rejected",
            style("!").yellow(),
        );
    }

    let state = AppState::from_settings(settings)?;

    println!(
        "{} Starting corpdir server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(state, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 127.0.0.1:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8080
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), 8080))
}
