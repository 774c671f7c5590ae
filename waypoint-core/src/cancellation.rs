//! Cooperative cancellation and bounded provider calls.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Cooperative cancellation token wrapping an `AtomicBool` plus a `Notify`
/// so in-flight provider calls can be aborted from another task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a new token (not cancelled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation and wake every waiter.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Why a bounded call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    TimedOut(Duration),
    Cancelled,
}

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimedOut(d) => write!(f, "timed out after {}ms", d.as_millis()),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Run `fut` bounded by `timeout` and, when given, the cancellation token.
pub async fn bounded<F, T>(
    fut: F,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
) -> Result<T, Interrupted>
where
    F: Future<Output = T>,
{
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(Interrupted::Cancelled);
    }

    let timed = tokio::time::timeout(timeout, fut);
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(Interrupted::Cancelled),
            res = timed => res.map_err(|_| Interrupted::TimedOut(timeout)),
        },
        None => timed.await.map_err(|_| Interrupted::TimedOut(timeout)),
    }
}
