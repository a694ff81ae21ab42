//! Per-request context: correlation ID, log scope, and deadline.
//!
//! A fresh context is built for every inbound call and threaded
//! explicitly through middleware, handlers, and the company service.
//! Contexts are never pooled or reused across requests.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::Span;
use uuid::Uuid;

/// The per-request deadline elapsed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Request-scoped context carried through every downstream call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    path: String,
    deadline: Instant,
}

impl RequestContext {
    /// Build a fresh context for one inbound request.
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            path: path.into(),
            deadline: Instant::now() + timeout,
        }
    }

    /// Correlation ID for log lines belonging to this request. Never
    /// persisted; unique for the process lifetime.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Route path of the request, for log scoping.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Absolute deadline of the request.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Tracing span binding the correlation ID and route path. All
    /// downstream log lines for the request run inside this span.
    pub fn span(&self) -> Span {
        tracing::info_span!("request", request_id = %self.request_id, path = %self.path)
    }

    /// Run a future under this request's deadline. The future is
    /// dropped (abandoned, not retried) when the deadline elapses.
    pub async fn bound<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: std::future::Future,
    {
        tokio::time::timeout_at(self.deadline, fut)
            .await
            .map_err(|_| DeadlineExceeded)
    }
}
