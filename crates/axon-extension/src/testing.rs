//! Test doubles for extensions and the API façade.
//!
//! Two helpers ship with the SDK so extensions (and the hub runtime's
//! own tests) can be exercised without a full hub:
//!
//! - [`FakeApi`]: an [`ExtensionApi`] that records every call and serves
//!   canned shared-state results.
//! - [`ScriptedExtension`]: an [`Extension`] whose identity, readiness
//!   and lifecycle log are driven from the outside.
//!
//! # Example
//!
//! ```
//! use axon_extension::testing::FakeApi;
//! use axon_extension::{ExtensionApi, SharedStateResult, SharedStateType};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let api = Arc::new(FakeApi::new());
//! api.put_shared_state(
//!     SharedStateType::Standard,
//!     "com.example.config",
//!     SharedStateResult::set(json!({"ready": true})),
//! );
//!
//! let result = api
//!     .get_shared_state(
//!         SharedStateType::Standard,
//!         "com.example.config",
//!         None,
//!         false,
//!         axon_extension::SharedStateResolution::Any,
//!     )
//!     .await;
//! assert!(result.expect("registered").is_set());
//! # });
//! ```

use crate::{
    EventListener, Extension, ExtensionApi, PendingResolution, SharedStateResolution,
    SharedStateResult, SharedStateType,
};
use async_trait::async_trait;
use axon_event::{Event, EventHistoryRequest, EventHistoryResultHandler};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A recorded `create_shared_state` call.
#[derive(Debug, Clone)]
pub struct SharedStateWrite {
    /// Family the state was written to.
    pub kind: SharedStateType,
    /// Payload.
    pub state: Value,
    /// Id of the reference event, if one was given.
    pub event_name: Option<String>,
}

/// Recording [`ExtensionApi`] double.
///
/// All mutating calls are logged; shared-state reads are served from a
/// table populated with [`put_shared_state`](Self::put_shared_state).
#[derive(Default)]
pub struct FakeApi {
    dispatched: Mutex<Vec<Event>>,
    listeners: Mutex<Vec<(String, String)>>,
    writes: Mutex<Vec<SharedStateWrite>>,
    states: Mutex<HashMap<(SharedStateType, String), SharedStateResult>>,
    started: AtomicBool,
    unregistered: AtomicBool,
}

impl FakeApi {
    /// Creates an empty double with events started.
    #[must_use]
    pub fn new() -> Self {
        let api = Self::default();
        api.started.store(true, Ordering::SeqCst);
        api
    }

    /// Installs the result served for `(kind, owner)` reads.
    pub fn put_shared_state(
        &self,
        kind: SharedStateType,
        owner: impl Into<String>,
        result: SharedStateResult,
    ) {
        self.states
            .lock()
            .expect("lock")
            .insert((kind, owner.into()), result);
    }

    /// Events dispatched through this double, in order.
    #[must_use]
    pub fn dispatched(&self) -> Vec<Event> {
        self.dispatched.lock().expect("lock").clone()
    }

    /// `(event_type, source)` pairs registered so far.
    #[must_use]
    pub fn listener_registrations(&self) -> Vec<(String, String)> {
        self.listeners.lock().expect("lock").clone()
    }

    /// Shared-state writes in call order.
    #[must_use]
    pub fn shared_state_writes(&self) -> Vec<SharedStateWrite> {
        self.writes.lock().expect("lock").clone()
    }

    /// Whether events are currently started.
    #[must_use]
    pub fn events_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Whether `unregister_extension` was called.
    #[must_use]
    pub fn unregister_requested(&self) -> bool {
        self.unregistered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtensionApi for FakeApi {
    fn register_event_listener(&self, event_type: &str, source: &str, _listener: EventListener) {
        self.listeners
            .lock()
            .expect("lock")
            .push((event_type.to_string(), source.to_string()));
    }

    fn dispatch(&self, event: Event) {
        self.dispatched.lock().expect("lock").push(event);
    }

    fn start_events(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn stop_events(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    fn create_shared_state(&self, kind: SharedStateType, state: Value, event: Option<&Event>) {
        self.writes.lock().expect("lock").push(SharedStateWrite {
            kind,
            state,
            event_name: event.map(|e| e.name().to_string()),
        });
    }

    async fn create_pending_shared_state(
        &self,
        _kind: SharedStateType,
        _event: Option<&Event>,
    ) -> Option<PendingResolution> {
        Some(PendingResolution::new(Arc::new(|_value| {})))
    }

    async fn get_shared_state(
        &self,
        kind: SharedStateType,
        extension_name: &str,
        _event: Option<&Event>,
        _barrier: bool,
        _resolution: SharedStateResolution,
    ) -> Option<SharedStateResult> {
        self.states
            .lock()
            .expect("lock")
            .get(&(kind, extension_name.to_string()))
            .cloned()
    }

    fn unregister_extension(&self) {
        self.unregistered.store(true, Ordering::SeqCst);
    }

    fn get_historical_events(
        &self,
        _requests: Vec<EventHistoryRequest>,
        _enforce_order: bool,
        handler: EventHistoryResultHandler,
    ) {
        handler(0);
    }
}

/// Lifecycle notification recorded by [`ScriptedExtension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCall {
    /// `on_registered` fired.
    Registered,
    /// `on_unregistered` fired.
    Unregistered,
}

/// Externally scripted [`Extension`].
///
/// Readiness is a shared predicate so tests can flip it while the hub
/// runs; lifecycle calls land in a shared log.
pub struct ScriptedExtension {
    name: String,
    friendly_name: Option<String>,
    version: Option<String>,
    ready: Arc<dyn Fn(&Event) -> bool + Send + Sync>,
    lifecycle: Arc<Mutex<Vec<LifecycleCall>>>,
}

impl ScriptedExtension {
    /// Creates an always-ready extension with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            version: None,
            ready: Arc::new(|_| true),
            lifecycle: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly.into());
        self
    }

    /// Sets the version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Replaces the readiness predicate.
    #[must_use]
    pub fn ready_when(mut self, ready: Arc<dyn Fn(&Event) -> bool + Send + Sync>) -> Self {
        self.ready = ready;
        self
    }

    /// Shared handle on the lifecycle log.
    #[must_use]
    pub fn lifecycle_log(&self) -> Arc<Mutex<Vec<LifecycleCall>>> {
        Arc::clone(&self.lifecycle)
    }
}

impl Extension for ScriptedExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn on_registered(&mut self) {
        self.lifecycle
            .lock()
            .expect("lock")
            .push(LifecycleCall::Registered);
    }

    fn on_unregistered(&mut self) {
        self.lifecycle
            .lock()
            .expect("lock")
            .push(LifecycleCall::Unregistered);
    }

    fn ready_for_event(&mut self, event: &Event) -> bool {
        (self.ready)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fake_api_records_calls() {
        let api = FakeApi::new();

        api.dispatch(Event::new("a", "t", "s"));
        api.register_event_listener("t", "s", Arc::new(|_| {}));
        api.create_shared_state(SharedStateType::Standard, json!({"k": 1}), None);
        api.stop_events();

        assert_eq!(api.dispatched().len(), 1);
        assert_eq!(api.listener_registrations(), vec![("t".into(), "s".into())]);
        assert_eq!(api.shared_state_writes().len(), 1);
        assert!(!api.events_started());
    }

    #[test]
    fn scripted_extension_logs_lifecycle() {
        let mut ext = ScriptedExtension::new("com.example.scripted")
            .with_friendly_name("Scripted")
            .with_version("1.2.3");
        let log = ext.lifecycle_log();

        ext.on_registered();
        ext.on_unregistered();

        assert_eq!(
            log.lock().expect("lock").as_slice(),
            &[LifecycleCall::Registered, LifecycleCall::Unregistered]
        );
        assert_eq!(ext.friendly_name(), Some("Scripted"));
        assert_eq!(ext.version(), Some("1.2.3"));
    }

    #[test]
    fn scripted_readiness_is_externally_driven() {
        let gate = Arc::new(AtomicBool::new(false));
        let gate_in = Arc::clone(&gate);
        let mut ext = ScriptedExtension::new("com.example.gated")
            .ready_when(Arc::new(move |_| gate_in.load(Ordering::SeqCst)));

        let event = Event::new("e", "t", "s");
        assert!(!ext.ready_for_event(&event));
        gate.store(true, Ordering::SeqCst);
        assert!(ext.ready_for_event(&event));
    }
}
