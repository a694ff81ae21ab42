//! Request admission and context-setup middleware.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use super::AppState;
use crate::context::RequestContext;

/// Reject every request once draining has begun; otherwise keep the
/// request counted as in-flight until the response is produced. The
/// guard is dropped on every exit path, including panics unwinding
/// through the handler.
pub async fn shutdown_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(_guard) = state.shutdown.try_begin_request() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    next.run(req).await
}

/// Attach a fresh [`RequestContext`] to the request and run the rest of
/// the pipeline inside its tracing span. A new context is built per
/// call; nothing is pooled or shared across requests.
pub async fn request_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(req.uri().path(), state.request_timeout);
    let span = ctx.span();
    req.extensions_mut().insert(ctx);
    next.run(req).instrument(span).await
}
