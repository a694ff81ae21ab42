//! API server for company records.
//!
//! Assembles the axum application: shutdown gate, per-request context,
//! geo-ACL on mutating routes, and the CRUD handlers.

mod geo;
mod handlers;
mod middleware;
mod routes;
mod shutdown;

pub use routes::create_router;
pub use shutdown::{DrainTimedOut, InFlightGuard, ShutdownCoordinator};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use crate::companies::CompanyService;
use crate::config::Settings;
use crate::geoip::{AllowedCountries, GeoLocator, IpApiClient};
use crate::store::{CompanyStore, SqliteCompanyStore};

/// Upper bound on waiting for in-flight requests during shutdown.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub companies: CompanyService,
    pub geoip: Arc<dyn GeoLocator>,
    pub allowed_countries: Arc<AllowedCountries>,
    pub shutdown: Arc<ShutdownCoordinator>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        store: Arc<dyn CompanyStore>,
        geoip: Arc<dyn GeoLocator>,
        allowed_countries: AllowedCountries,
        request_timeout: Duration,
    ) -> Self {
        Self {
            companies: CompanyService::new(store),
            geoip,
            allowed_countries: Arc::new(allowed_countries),
            shutdown: ShutdownCoordinator::new(),
            request_timeout,
        }
    }

    /// Assemble state from settings: SQLite store and ipapi.com client.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = SqliteCompanyStore::open(&settings.database_path)
            .context("failed to open company database")?;
        let geoip = IpApiClient::with_base_url(&settings.ipapi_url, &settings.ipapi_key);
        Ok(Self::new(
            Arc::new(store),
            Arc::new(geoip),
            AllowedCountries::new(settings.allowed_countries.iter().cloned()),
            settings.request_timeout(),
        ))
    }
}

/// Run the server until a termination signal, then drain in-flight
/// requests. Failing to drain within [`DRAIN_TIMEOUT`] is a fatal
/// shutdown fault and surfaces as an error.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("invalid listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        address = %addr,
        allowed_countries = state.allowed_countries.len(),
        "starting server"
    );

    serve_with_listener(state, listener, shutdown_signal(), DRAIN_TIMEOUT).await
}

/// Serve on an already-bound listener until `shutdown` resolves, then
/// drain. The drain wait is bounded by `drain_timeout` even while
/// connections are still open: a request that refuses to finish (for
/// example a client trickling a request body) turns into a
/// [`DrainTimedOut`] error instead of blocking shutdown forever.
pub async fn serve_with_listener(
    state: AppState,
    listener: tokio::net::TcpListener,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    drain_timeout: Duration,
) -> anyhow::Result<()> {
    let app = create_router(state.clone());
    let coordinator = state.shutdown.clone();
    let drain_trigger = {
        let coordinator = coordinator.clone();
        async move {
            shutdown.await;
            info!("shutdown signal received, draining in-flight requests");
            coordinator.begin_drain();
        }
    };

    let server = async {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(drain_trigger)
        .await
    };

    let drain_bound = async {
        coordinator.draining().await;
        coordinator.wait_for_drain(drain_timeout).await
    };

    // The graceful-shutdown wait inside axum::serve is unbounded, so
    // race it against the bounded drain.
    tokio::select! {
        result = server => {
            result.context("server failed")?;
            coordinator
                .wait_for_drain(drain_timeout)
                .await
                .context("graceful shutdown failed")?;
        }
        result = drain_bound => {
            result.context("graceful shutdown failed")?;
        }
    }

    info!("server shutdown complete");
    Ok(())
}

/// Wait for either Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
