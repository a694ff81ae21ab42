//! Geo-ACL gate for mutating routes.
//!
//! Resolves the caller's IP to a country and only forwards the request
//! when that country is in the allow-set. A failed lookup rejects the
//! request; it never falls through to the handler.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use super::AppState;
use crate::context::RequestContext;

/// Resolve the client IP: `X-Forwarded-For` first hop, then
/// `X-Real-Ip`, then the peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }
    peer.map(|addr| addr.ip().to_string())
}

/// Allow or deny a mutating request based on the caller's resolved
/// country.
pub async fn geo_acl(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(ctx) = req.extensions().get::<RequestContext>().cloned() else {
        error!("request context missing in geo gate");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let Some(ip) = client_ip(req.headers(), peer) else {
        error!("could not determine client ip");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let country = match ctx.bound(state.geoip.country_for_ip(&ip)).await {
        Ok(Ok(country)) => country,
        Ok(Err(err)) => {
            error!(ip = %ip, error = %err, "error fetching client ip country");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(_) => {
            error!(ip = %ip, "client ip country lookup timed out");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !state.allowed_countries.contains(&country) {
        warn!(ip = %ip, country = %country, "nonwhitelisted client country");
        return StatusCode::FORBIDDEN.into_response();
    }

    info!(ip = %ip, country = %country, "validated client call country");
    next.run(req).await
}
