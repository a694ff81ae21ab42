//! Graceful shutdown coordination.
//!
//! Two states: running and draining. While running, every admitted
//! request holds an [`InFlightGuard`]; once draining starts, admission
//! fails and the coordinator can be awaited until the in-flight count
//! reaches zero. Draining is terminal.
//!
//! The admission check and the counter increment happen under one
//! lock, so no request is ever counted after draining begins.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Notify;

/// In-flight requests did not finish within the drain limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("in-flight requests did not drain in time")]
pub struct DrainTimedOut;

#[derive(Debug, Default)]
struct CoordinatorState {
    draining: bool,
    in_flight: u64,
}

/// Tracks in-flight requests and gates admission during shutdown.
#[derive(Debug, Default)]
pub struct ShutdownCoordinator {
    state: Mutex<CoordinatorState>,
    drain_started: Notify,
    drained: Notify,
}

impl ShutdownCoordinator {
    pub fn new() -> Arc<Self> {
        Arc::default()
    }

    /// Admit a request. Returns `None` once draining has begun; the
    /// returned guard keeps the request counted until dropped.
    pub fn try_begin_request(self: &Arc<Self>) -> Option<InFlightGuard> {
        let mut state = self.state.lock().expect("shutdown state lock poisoned");
        if state.draining {
            return None;
        }
        state.in_flight += 1;
        Some(InFlightGuard {
            coordinator: Arc::clone(self),
        })
    }

    /// Enter the draining state. New requests are rejected from this
    /// point on; already-admitted requests keep running. Idempotent,
    /// and there is no way back to the running state.
    pub fn begin_drain(&self) {
        let mut state = self.state.lock().expect("shutdown state lock poisoned");
        state.draining = true;
        if state.in_flight == 0 {
            self.drained.notify_waiters();
        }
        self.drain_started.notify_waiters();
    }

    /// Wait until draining has begun. Resolves immediately if it
    /// already has.
    pub async fn draining(&self) {
        loop {
            // Register before checking so a begin_drain in between is
            // not missed.
            let started = self.drain_started.notified();
            if self.is_draining() {
                return;
            }
            started.await;
        }
    }

    pub fn is_draining(&self) -> bool {
        self.state
            .lock()
            .expect("shutdown state lock poisoned")
            .draining
    }

    /// Current number of admitted, unfinished requests.
    pub fn in_flight(&self) -> u64 {
        self.state
            .lock()
            .expect("shutdown state lock poisoned")
            .in_flight
    }

    /// Wait until every admitted request has finished, giving up after
    /// `limit`.
    pub async fn wait_for_drain(&self, limit: Duration) -> Result<(), DrainTimedOut> {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            // Register for notification before re-checking the count,
            // otherwise a guard dropped in between would be missed.
            let notified = self.drained.notified();
            if self.in_flight() == 0 {
                return Ok(());
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Err(DrainTimedOut);
            }
        }
    }
}

/// Keeps one request counted as in-flight. Dropping the guard (on any
/// exit path, including panics) releases the slot.
#[derive(Debug)]
pub struct InFlightGuard {
    coordinator: Arc<ShutdownCoordinator>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self
            .coordinator
            .state
            .lock()
            .expect("shutdown state lock poisoned");
        state.in_flight -= 1;
        if state.in_flight == 0 && state.draining {
            self.coordinator.drained.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admits_while_running() {
        let coordinator = ShutdownCoordinator::new();
        let guard = coordinator.try_begin_request();
        assert!(guard.is_some());
        assert_eq!(coordinator.in_flight(), 1);
        drop(guard);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_rejects_after_drain_begins() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.begin_drain();
        assert!(coordinator.is_draining());
        assert!(coordinator.try_begin_request().is_none());
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_drain_is_terminal_and_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.begin_drain();
        coordinator.begin_drain();
        assert!(coordinator.is_draining());
        assert!(coordinator.try_begin_request().is_none());
    }

    #[tokio::test]
    async fn test_draining_resolves_on_drain_start() {
        let coordinator = ShutdownCoordinator::new();

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.draining().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        coordinator.begin_drain();
        waiter.await.unwrap();

        // Already-draining resolves immediately.
        coordinator.draining().await;
    }

    #[tokio::test]
    async fn test_wait_returns_once_requests_finish() {
        let coordinator = ShutdownCoordinator::new();
        let guard = coordinator.try_begin_request().expect("should admit");
        coordinator.begin_drain();

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.wait_for_drain(Duration::from_secs(5)).await })
        };

        // Give the waiter a chance to block on a nonzero count.
        tokio::task::yield_now().await;
        drop(guard);

        assert_eq!(waiter.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_wait_with_no_requests_returns_immediately() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.begin_drain();
        assert_eq!(
            coordinator.wait_for_drain(Duration::from_millis(10)).await,
            Ok(())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_when_requests_stall() {
        let coordinator = ShutdownCoordinator::new();
        let _guard = coordinator.try_begin_request().expect("should admit");
        coordinator.begin_drain();

        assert_eq!(
            coordinator.wait_for_drain(Duration::from_secs(30)).await,
            Err(DrainTimedOut)
        );
    }

    #[tokio::test]
    async fn test_concurrent_admission_counts_exactly() {
        let coordinator = ShutdownCoordinator::new();
        let mut handles = Vec::new();
        for _ in 0..64 {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                coordinator.try_begin_request().is_some()
            }));
        }
        let admitted = {
            let mut n = 0u64;
            for handle in handles {
                if handle.await.unwrap() {
                    n += 1;
                }
            }
            n
        };
        // Guards were dropped inside the tasks.
        assert_eq!(coordinator.in_flight(), 0);
        assert_eq!(admitted, 64);
    }

    #[tokio::test]
    async fn test_no_admission_race_with_drain() {
        // Requests admitted strictly before draining are counted;
        // anything after begin_drain is rejected.
        let coordinator = ShutdownCoordinator::new();
        let mut guards = Vec::new();
        for _ in 0..8 {
            guards.push(coordinator.try_begin_request().expect("running"));
        }
        coordinator.begin_drain();
        for _ in 0..8 {
            assert!(coordinator.try_begin_request().is_none());
        }
        assert_eq!(coordinator.in_flight(), 8);
        guards.clear();
        assert_eq!(coordinator.in_flight(), 0);
    }
}
