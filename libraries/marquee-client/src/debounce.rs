//! Debounced async calls with real cancellation.
//!
//! A [`Debouncer`] holds at most one live call. Scheduling a new call
//! cancels the previous one whether it is still waiting out its delay or
//! already running: the spawned task is raced against a
//! [`CancellationToken`], so dropping out of the race drops the call's
//! future and any request it was awaiting.
//!
//! Cancellation alone cannot stop a call that has already finished its
//! await and is about to publish. Each call therefore receives a
//! [`Ticket`] carrying the generation it was scheduled under; state
//! writes are gated on [`Ticket::is_current`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Schedules one debounced async call at a time.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    token: Option<CancellationToken>,
}

/// Per-call generation token.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
    token: CancellationToken,
}

impl Ticket {
    /// Whether this call is still the latest one scheduled and not cancelled.
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled() && self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Generation this call was scheduled under.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle for cancelling one scheduled call.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Cancel the call. Has no effect if it already completed.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the call was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            token: None,
        }
    }

    /// Quiet period before a scheduled call runs.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any previous call and schedule `call` to run after the delay.
    pub fn schedule<F, Fut>(&mut self, call: F) -> CancelHandle
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let ticket = Ticket {
            generation: self.generation.load(Ordering::SeqCst),
            current: Arc::clone(&self.generation),
            token: token.clone(),
        };
        let delay = self.delay;
        let task_token = token.clone();

        tokio::spawn(async move {
            let generation = ticket.generation;
            tokio::select! {
                biased;
                () = task_token.cancelled() => {
                    trace!(generation, "Debounced call cancelled");
                }
                () = async move {
                    tokio::time::sleep(delay).await;
                    call(ticket).await;
                } => {}
            }
        });

        self.token = Some(token.clone());
        CancelHandle { token }
    }

    /// Cancel the pending or in-flight call, if any.
    ///
    /// Any ticket handed out before this point stops being current.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
