//! Response-event correlation.
//!
//! A producer that dispatches a trigger event can register a
//! [`ResponseCallback`] with a deadline. When an event arrives whose
//! `response_id` matches the trigger, the deadline is cancelled and the
//! callback's `call` runs; when the deadline fires first, `fail` runs
//! with [`ResponseError::CallbackTimeout`]. Exactly one of the two
//! happens per registration.
//!
//! ```text
//! register(trigger, timeout, cb)
//!        │                          response event arrives
//!        ├── timer task ──sleep──┐       │
//!        │        ▲              │       ▼
//!        │        └── cancelled ─┼── resolve(): cb.call(event)
//!        │                       │
//!        │                       └─(fires first)─ cb.fail(Timeout)
//! ```
//!
//! Callbacks run on a bounded worker pool so a slow consumer cannot
//! stall the dispatcher.

use super::dispatcher::DispatcherMessage;
use axon_event::Event;
use axon_types::{ErrorCode, EventId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{debug, warn};

/// Number of concurrently running response callbacks.
const COMPLETION_WORKERS: usize = 4;

/// Error delivered to [`ResponseCallback::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// No response arrived before the deadline, or the hub shut down
    /// with the registration outstanding.
    #[error("response listener timed out")]
    CallbackTimeout,
}

impl ErrorCode for ResponseError {
    fn code(&self) -> &'static str {
        match self {
            Self::CallbackTimeout => "RESPONSE_CALLBACK_TIMEOUT",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Callback for a registered response listener.
///
/// Exactly one of the two methods is invoked per registration. Both run
/// on a completion worker; a panic is caught and logged.
pub trait ResponseCallback: Send + Sync {
    /// A response event matching the trigger arrived.
    fn call(&self, event: Event);

    /// The registration failed, today only by timeout.
    fn fail(&self, error: ResponseError);
}

struct PendingResponse {
    callback: Arc<dyn ResponseCallback>,
    // Dropping this cancels the deadline task.
    _cancel: oneshot::Sender<()>,
}

/// Table of outstanding response registrations.
///
/// Owned by the dispatcher writer; all mutation is serialized there,
/// which is what makes call/fail exclusivity hold.
pub(crate) struct CompletionHandlers {
    pending: HashMap<EventId, PendingResponse>,
    workers: Arc<Semaphore>,
}

impl CompletionHandlers {
    pub(crate) fn new() -> Self {
        Self {
            pending: HashMap::new(),
            workers: Arc::new(Semaphore::new(COMPLETION_WORKERS)),
        }
    }

    /// Registers `callback` for responses to `trigger_id` and arms its
    /// deadline.
    ///
    /// Re-registering the same trigger replaces the previous entry; the
    /// replaced callback is never invoked.
    pub(crate) fn register(
        &mut self,
        trigger_id: EventId,
        timeout: Duration,
        callback: Arc<dyn ResponseCallback>,
        timeout_tx: mpsc::UnboundedSender<DispatcherMessage>,
    ) {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    let _ = timeout_tx.send(DispatcherMessage::ResponseTimeout { trigger_id });
                }
                _ = cancel_rx => {}
            }
        });

        let previous = self.pending.insert(
            trigger_id,
            PendingResponse {
                callback,
                _cancel: cancel_tx,
            },
        );
        if previous.is_some() {
            warn!(%trigger_id, "response listener replaced for trigger");
        }
    }

    /// Routes a response event; invokes `call` when a registration
    /// matches, cancelling its deadline.
    pub(crate) fn resolve(&mut self, trigger_id: EventId, event: &Event) {
        let Some(entry) = self.pending.remove(&trigger_id) else {
            return;
        };
        debug!(%trigger_id, "response listener resolved");
        let event = event.clone();
        self.spawn_worker(move |callback| callback.call(event), entry.callback);
    }

    /// Fails a registration whose deadline fired, if it is still
    /// outstanding.
    pub(crate) fn timeout(&mut self, trigger_id: EventId) {
        let Some(entry) = self.pending.remove(&trigger_id) else {
            return;
        };
        debug!(%trigger_id, "response listener timed out");
        self.spawn_worker(
            |callback| callback.fail(ResponseError::CallbackTimeout),
            entry.callback,
        );
    }

    /// Fails every outstanding registration; used at shutdown.
    pub(crate) fn fail_all(&mut self) {
        let entries: Vec<_> = self.pending.drain().collect();
        for (trigger_id, entry) in entries {
            debug!(%trigger_id, "response listener failed by shutdown");
            self.spawn_worker(
                |callback| callback.fail(ResponseError::CallbackTimeout),
                entry.callback,
            );
        }
    }

    fn spawn_worker(
        &self,
        run: impl FnOnce(&dyn ResponseCallback) + Send + 'static,
        callback: Arc<dyn ResponseCallback>,
    ) {
        let workers = Arc::clone(&self.workers);
        tokio::spawn(async move {
            // The semaphore is never closed; a failed acquire only means
            // the runtime is tearing down.
            let Ok(_permit) = workers.acquire_owned().await else {
                return;
            };
            invoke_guarded(|| run(callback.as_ref()));
        });
    }
}

fn invoke_guarded(run: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(run)).is_err() {
        warn!("response callback panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_types::assert_error_codes;

    #[test]
    fn error_codes_valid() {
        assert_error_codes(&[ResponseError::CallbackTimeout], "RESPONSE_");
        assert!(ResponseError::CallbackTimeout.is_recoverable());
    }
}
