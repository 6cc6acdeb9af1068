//! The `ExtensionApi` façade.
//!
//! Everything an extension does against the hub goes through this
//! trait. The concrete implementation is injected at construction, so
//! extensions never hold the hub itself; tests substitute a fake (see
//! [`testing`](crate::testing)).
//!
//! # Blocking reads
//!
//! [`get_shared_state`](ExtensionApi::get_shared_state) and
//! [`create_pending_shared_state`](ExtensionApi::create_pending_shared_state)
//! are `async`: they hand the query to the hub writer and await its
//! reply. Callers that can await (extension-owned tasks) use them
//! directly.
//!
//! Listener handlers and [`ready_for_event`](crate::Extension::ready_for_event)
//! are synchronous, so the trait also provides
//! [`blocking_get_shared_state`](ExtensionApi::blocking_get_shared_state) and
//! [`blocking_create_pending_shared_state`](ExtensionApi::blocking_create_pending_shared_state):
//! thin wrappers that await the same reply on the caller's thread. This
//! is how an extension checks a dependency's state inline from its
//! readiness gate without losing ordering.
//!
//! Extensions call all four only from their own queue, which is always
//! distinct from the hub writer, so the round trip cannot deadlock.

use crate::extension::EventListener;
use crate::shared_state::{
    PendingResolution, SharedStateResolution, SharedStateResult, SharedStateType,
};
use async_trait::async_trait;
use axon_event::{Event, EventHistoryRequest, EventHistoryResultHandler};
use serde_json::Value;

/// Hub operations available to a registered extension.
#[async_trait]
pub trait ExtensionApi: Send + Sync {
    /// Registers a listener for events matching `(event_type, source)`.
    ///
    /// Matching is case-insensitive; `"*"` is the wildcard on either
    /// tag. Registering the exact same triple again is idempotent.
    fn register_event_listener(&self, event_type: &str, source: &str, listener: EventListener);

    /// Enqueues an event into the hub's global ingress.
    ///
    /// Fire and forget: the dispatch path surfaces no errors.
    fn dispatch(&self, event: Event);

    /// Resumes event delivery to this extension.
    fn start_events(&self);

    /// Pauses event delivery to this extension. Events keep
    /// accumulating in order and are delivered after
    /// [`start_events`](Self::start_events).
    fn stop_events(&self);

    /// Publishes a SET shared state for this extension.
    ///
    /// The version is the event's number, or a fresh hub tick when
    /// `event` is `None` (zero for the very first bootstrap state).
    /// Logged and ignored when the extension is not fully initialized.
    fn create_shared_state(&self, kind: SharedStateType, state: Value, event: Option<&Event>);

    /// Reserves a PENDING shared state and returns its one-shot
    /// resolver.
    ///
    /// Returns `None` when the extension is not fully initialized or
    /// the hub is shutting down.
    async fn create_pending_shared_state(
        &self,
        kind: SharedStateType,
        event: Option<&Event>,
    ) -> Option<PendingResolution>;

    /// Reads another extension's shared state relative to `event`.
    ///
    /// Returns `None` when `extension_name` is not registered, which is
    /// distinct from a result with
    /// [`SharedStateStatus::None`](crate::SharedStateStatus::None).
    /// With `barrier` set, a SET result is downgraded to PENDING unless
    /// the owner has processed every event strictly before `event`.
    async fn get_shared_state(
        &self,
        kind: SharedStateType,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
        resolution: SharedStateResolution,
    ) -> Option<SharedStateResult>;

    /// Requests deregistration of this extension.
    fn unregister_extension(&self);

    /// Forwards a query to the event-history collaborator.
    fn get_historical_events(
        &self,
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    );

    /// Synchronous façade over
    /// [`get_shared_state`](Self::get_shared_state): awaits the hub
    /// writer's reply on the calling thread.
    ///
    /// Intended for listener handlers and
    /// [`ready_for_event`](crate::Extension::ready_for_event), which
    /// cannot await. The semantics are identical to the async variant.
    ///
    /// # Panics
    ///
    /// Panics when called outside a multi-thread tokio runtime. Calling
    /// it from the hub writer itself would deadlock; extensions only
    /// ever run on their own queues, so this cannot happen from
    /// extension code.
    fn blocking_get_shared_state(
        &self,
        kind: SharedStateType,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
        resolution: SharedStateResolution,
    ) -> Option<SharedStateResult> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(self.get_shared_state(
                kind,
                extension_name,
                event,
                barrier,
                resolution,
            ))
        })
    }

    /// Synchronous façade over
    /// [`create_pending_shared_state`](Self::create_pending_shared_state);
    /// same contract as
    /// [`blocking_get_shared_state`](Self::blocking_get_shared_state).
    ///
    /// # Panics
    ///
    /// Panics when called outside a multi-thread tokio runtime.
    fn blocking_create_pending_shared_state(
        &self,
        kind: SharedStateType,
        event: Option<&Event>,
    ) -> Option<PendingResolution> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(self.create_pending_shared_state(kind, event))
        })
    }
}
