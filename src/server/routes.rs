//! Router configuration for the API server.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use super::{geo, handlers, middleware, AppState};

/// Create the main router with all routes and middleware.
///
/// Pipeline order: shutdown gate, then request-context setup, then (for
/// mutating routes only) the geo-ACL gate, then the handler.
pub fn create_router(state: AppState) -> Router {
    // Mutating routes sit behind the geo-ACL gate.
    let geo_gated = Router::new()
        .route("/v1/companies", axum::routing::post(handlers::create_company))
        .route(
            "/v1/companies/:company_id",
            axum::routing::delete(handlers::delete_company),
        )
        .route_layer(from_fn_with_state(state.clone(), geo::geo_acl));

    Router::new()
        .route("/v1", get(handlers::liveness))
        .route("/v1/companies", get(handlers::list_companies))
        .route(
            "/v1/companies/:company_id",
            get(handlers::get_company).put(handlers::update_company),
        )
        .merge(geo_gated)
        .layer(from_fn_with_state(state.clone(), middleware::request_context))
        .layer(from_fn_with_state(state.clone(), middleware::shutdown_gate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
