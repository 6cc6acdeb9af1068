//! EventHub - ingress, registry, and shared-state writer.
//!
//! [`EventHub`] is the cloneable handle hosts and producers use. Behind
//! it run two single-writer tasks:
//!
//! - the **hub writer** (this module): assigns event numbers, owns the
//!   extension registry and every shared-state manager, and drives
//!   lifecycle
//! - the **dispatcher writer** ([`super::dispatcher`]): preprocessors,
//!   response routing, fan-out, history submission
//!
//! All mutation flows through [`HubCommand`] messages, so ordering
//! follows from channel FIFO: two dispatches are numbered in arrival
//! order, and a registration completed before a dispatch is visible to
//! that event's fan-out.
//!
//! # Rules
//!
//! - `dispatch` is fire-and-forget; the ingress path returns no errors
//! - Events dispatched before `start()` are numbered immediately and
//!   buffered by the dispatcher
//! - The hub's own registry snapshot is published as a shared state
//!   under [`EVENT_HUB_NAME`](axon_event::names::EVENT_HUB_NAME) after
//!   every registry change once started

use super::completion::ResponseCallback;
use super::dispatcher::{self, DispatcherMessage};
use super::error::HubError;
use super::wrapper::WrapperType;
use crate::container::{self, ContainerHandle, ContainerMessage};
use crate::history::{EventHistory, InMemoryEventHistory};
use crate::preprocessor::EventPreprocessor;
use crate::shared_state::SharedStateManager;
use axon_event::names::{data_key, event_source, event_type, EVENT_HUB_NAME};
use axon_event::{Event, EventHistoryRequest, EventHistoryResultHandler};
use axon_extension::{
    EventListener, Extension, ExtensionFactory, RegistrationCallback, RegistrationError,
    SharedStateResolution, SharedStateResult, SharedStateType,
};
use axon_types::{EventId, EventNumber};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

/// Message into the hub writer.
pub(crate) enum HubCommand {
    Dispatch(Event),
    RegisterExtension {
        factory: ExtensionFactory,
        callback: Option<RegistrationCallback>,
    },
    /// Sent by a container once its extension is constructed.
    CompleteRegistration {
        name: String,
        friendly_name: Option<String>,
        version: Option<String>,
        metadata: Option<HashMap<String, String>>,
        container: ContainerHandle,
        callback: Option<RegistrationCallback>,
    },
    UnregisterExtension {
        name: String,
        callback: Option<RegistrationCallback>,
    },
    Start,
    SetWrapper(WrapperType),
    RegisterPreprocessor(Box<dyn EventPreprocessor>),
    RegisterResponseListener {
        trigger_id: EventId,
        timeout: Duration,
        callback: Arc<dyn ResponseCallback>,
    },
    RegisterHubListener {
        event_type: String,
        source: String,
        listener: EventListener,
    },
    CreateSharedState {
        kind: SharedStateType,
        name: String,
        data: Value,
        event_id: Option<EventId>,
    },
    CreatePendingSharedState {
        kind: SharedStateType,
        name: String,
        event_id: Option<EventId>,
        reply: oneshot::Sender<Option<EventNumber>>,
    },
    ResolvePendingSharedState {
        kind: SharedStateType,
        name: String,
        version: EventNumber,
        data: Value,
    },
    GetSharedState {
        kind: SharedStateType,
        name: String,
        event_id: Option<EventId>,
        barrier: bool,
        resolution: SharedStateResolution,
        reply: oneshot::Sender<Option<SharedStateResult>>,
    },
    GetHistoricalEvents {
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    },
    Shutdown {
        done: Option<oneshot::Sender<()>>,
    },
}

/// The event hub handle.
///
/// Cheap to clone; all clones address the same hub. Construction spawns
/// the writer tasks, so a tokio runtime must be current.
///
/// # Example
///
/// ```no_run
/// use axon_event::Event;
/// use axon_extension::testing::ScriptedExtension;
/// use axon_hub::EventHub;
///
/// # async fn run() {
/// let hub = EventHub::new();
/// hub.register_extensions(
///     vec![Box::new(|_api| Ok(Box::new(ScriptedExtension::new("com.example.profile"))))],
///     None,
/// );
/// hub.dispatch(Event::new(
///     "Launch",
///     "com.axon.eventType.generic",
///     "com.axon.eventSource.requestContent",
/// ));
/// # }
/// ```
#[derive(Clone)]
pub struct EventHub {
    tx: mpsc::UnboundedSender<HubCommand>,
}

impl EventHub {
    /// Creates a hub with an in-memory event history.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history(Arc::new(InMemoryEventHistory::new()))
    }

    /// Creates a hub with the given event-history collaborator.
    #[must_use]
    pub fn with_history(history: Arc<dyn EventHistory>) -> Self {
        let (hub_tx, hub_rx) = mpsc::unbounded_channel();
        let (dispatcher_tx, dispatcher_rx) = mpsc::unbounded_channel();

        tokio::spawn(dispatcher::run(
            dispatcher_rx,
            dispatcher_tx.clone(),
            Arc::clone(&history),
        ));

        let core = HubWriter::new(hub_tx.clone(), dispatcher_tx, history);
        tokio::spawn(core.run(hub_rx));

        Self { tx: hub_tx }
    }

    /// Enqueues `event` into the global ingress. Fire and forget.
    pub fn dispatch(&self, event: Event) {
        self.send(HubCommand::Dispatch(event));
    }

    /// Registers one extension; the callback reports the outcome.
    pub fn register_extension(
        &self,
        factory: ExtensionFactory,
        callback: Option<RegistrationCallback>,
    ) {
        self.send(HubCommand::RegisterExtension { factory, callback });
    }

    /// Registers a batch of extensions, starts the hub once the last
    /// registration settles, then invokes `completion`.
    ///
    /// Individual registration failures are logged; they do not keep
    /// the hub from starting.
    pub fn register_extensions(
        &self,
        factories: Vec<ExtensionFactory>,
        completion: Option<Box<dyn FnOnce() + Send>>,
    ) {
        let completion = Arc::new(Mutex::new(completion));
        if factories.is_empty() {
            self.start();
            if let Some(done) = completion.lock().expect("lock").take() {
                done();
            }
            return;
        }

        let remaining = Arc::new(AtomicUsize::new(factories.len()));
        for factory in factories {
            let hub = self.clone();
            let remaining = Arc::clone(&remaining);
            let completion = Arc::clone(&completion);
            self.register_extension(
                factory,
                Some(Box::new(move |result| {
                    if let Err(err) = result {
                        warn!(%err, "extension registration failed");
                    }
                    if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                        hub.start();
                        if let Some(done) = completion.lock().expect("lock").take() {
                            done();
                        }
                    }
                })),
            );
        }
    }

    /// Requests deregistration of the named extension.
    pub fn unregister_extension(&self, name: &str, callback: Option<RegistrationCallback>) {
        self.send(HubCommand::UnregisterExtension {
            name: name.to_string(),
            callback,
        });
    }

    /// Starts draining dispatched events and publishes the hub state.
    pub fn start(&self) {
        self.send(HubCommand::Start);
    }

    /// Tags the host wrapper framework. Ignored (with a log) once the
    /// hub has started.
    pub fn set_wrapper_type(&self, wrapper: WrapperType) {
        self.send(HubCommand::SetWrapper(wrapper));
    }

    /// Appends a preprocessor to the pipeline.
    pub fn register_preprocessor(&self, preprocessor: Box<dyn EventPreprocessor>) {
        self.send(HubCommand::RegisterPreprocessor(preprocessor));
    }

    /// Registers `callback` for responses to `trigger`, with a
    /// deadline. Exactly one of `call`/`fail` will be invoked.
    pub fn register_response_listener(
        &self,
        trigger: &Event,
        timeout: Duration,
        callback: Arc<dyn ResponseCallback>,
    ) {
        self.send(HubCommand::RegisterResponseListener {
            trigger_id: trigger.id(),
            timeout,
            callback,
        });
    }

    /// Registers a hub-wide listener, hosted by the hub's internal
    /// placeholder extension.
    pub fn register_listener(&self, event_type: &str, source: &str, listener: EventListener) {
        self.send(HubCommand::RegisterHubListener {
            event_type: event_type.to_string(),
            source: source.to_string(),
            listener,
        });
    }

    /// Reads an extension's shared state; `None` means the extension is
    /// not registered.
    pub async fn get_shared_state(
        &self,
        kind: SharedStateType,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
        resolution: SharedStateResolution,
    ) -> Option<SharedStateResult> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(HubCommand::GetSharedState {
            kind,
            name: extension_name.to_string(),
            event_id: event.map(Event::id),
            barrier,
            resolution,
            reply: reply_tx,
        });
        reply_rx.await.ok()?
    }

    /// Forwards a query to the event-history collaborator.
    pub fn get_historical_events(
        &self,
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    ) {
        self.send(HubCommand::GetHistoricalEvents {
            requests,
            enforce_order,
            handler,
        });
    }

    /// Begins shutdown: stops accepting events, tears down containers,
    /// fails outstanding response listeners.
    pub fn shutdown(&self) {
        self.send(HubCommand::Shutdown { done: None });
    }

    /// Like [`shutdown`](Self::shutdown), resolving once the hub writer
    /// has dispatched the teardown.
    pub async fn shutdown_and_wait(&self) -> Result<(), HubError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(HubCommand::Shutdown {
            done: Some(done_tx),
        });
        done_rx.await.map_err(|_| HubError::ChannelClosed)
    }

    fn send(&self, command: HubCommand) {
        if self.tx.send(command).is_err() {
            debug!("event hub is no longer running, command dropped");
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal placeholder extension: owns the hub's registry shared state
/// and hosts hub-wide listeners.
struct HubPlaceholder;

impl Extension for HubPlaceholder {
    fn name(&self) -> &str {
        EVENT_HUB_NAME
    }

    fn friendly_name(&self) -> Option<&str> {
        Some("EventHub")
    }

    fn version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }
}

struct ExtensionRuntime {
    container: ContainerHandle,
    friendly_name: Option<String>,
    version: Option<String>,
    metadata: Option<HashMap<String, String>>,
    standard: SharedStateManager,
    xdm: SharedStateManager,
}

impl ExtensionRuntime {
    fn new(
        container: ContainerHandle,
        friendly_name: Option<String>,
        version: Option<String>,
        metadata: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            container,
            friendly_name,
            version,
            metadata,
            standard: SharedStateManager::new(),
            xdm: SharedStateManager::new(),
        }
    }

    fn manager(&self, kind: SharedStateType) -> &SharedStateManager {
        match kind {
            SharedStateType::Standard => &self.standard,
            SharedStateType::Xdm => &self.xdm,
        }
    }

    fn manager_mut(&mut self, kind: SharedStateType) -> &mut SharedStateManager {
        match kind {
            SharedStateType::Standard => &mut self.standard,
            SharedStateType::Xdm => &mut self.xdm,
        }
    }
}

struct HubWriter {
    hub_tx: mpsc::UnboundedSender<HubCommand>,
    dispatcher_tx: mpsc::UnboundedSender<DispatcherMessage>,
    history: Arc<dyn EventHistory>,
    registry: HashMap<String, ExtensionRuntime>,
    event_numbers: HashMap<EventId, EventNumber>,
    last_event_number: u64,
    wrapper: WrapperType,
    started: bool,
    shutting_down: bool,
}

impl HubWriter {
    fn new(
        hub_tx: mpsc::UnboundedSender<HubCommand>,
        dispatcher_tx: mpsc::UnboundedSender<DispatcherMessage>,
        history: Arc<dyn EventHistory>,
    ) -> Self {
        Self {
            hub_tx,
            dispatcher_tx,
            history,
            registry: HashMap::new(),
            event_numbers: HashMap::new(),
            last_event_number: 0,
            wrapper: WrapperType::None,
            started: false,
            shutting_down: false,
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<HubCommand>) {
        self.install_placeholder();
        info!("event hub writer running");

        while let Some(command) = rx.recv().await {
            let stop = self.handle(command);
            if stop {
                break;
            }
        }

        info!("event hub writer stopped");
    }

    /// The placeholder joins the registry like any extension, but is
    /// built inline so the hub state manager exists before `start()`.
    fn install_placeholder(&mut self) {
        let handle = container::spawn_prebuilt(Box::new(HubPlaceholder));
        let _ = self.dispatcher_tx.send(DispatcherMessage::AddSink {
            name: EVENT_HUB_NAME.to_string(),
            tx: handle.tx.clone(),
        });
        self.registry.insert(
            EVENT_HUB_NAME.to_string(),
            ExtensionRuntime::new(
                handle,
                Some("EventHub".to_string()),
                Some(env!("CARGO_PKG_VERSION").to_string()),
                None,
            ),
        );
    }

    /// Returns `true` when the writer should stop.
    fn handle(&mut self, command: HubCommand) -> bool {
        match command {
            HubCommand::Dispatch(event) => self.handle_dispatch(event),
            HubCommand::RegisterExtension { factory, callback } => {
                if self.shutting_down {
                    if let Some(callback) = callback {
                        callback(Err(RegistrationError::Unknown));
                    }
                } else {
                    container::spawn(factory, self.hub_tx.clone(), callback);
                }
            }
            HubCommand::CompleteRegistration {
                name,
                friendly_name,
                version,
                metadata,
                container,
                callback,
            } => self.handle_complete_registration(
                name,
                friendly_name,
                version,
                metadata,
                container,
                callback,
            ),
            HubCommand::UnregisterExtension { name, callback } => {
                self.handle_unregister(&name, callback);
            }
            HubCommand::Start => self.handle_start(),
            HubCommand::SetWrapper(wrapper) => {
                if self.started {
                    warn!("wrapper type can only be set before start, ignoring");
                } else {
                    self.wrapper = wrapper;
                }
            }
            HubCommand::RegisterPreprocessor(preprocessor) => {
                let _ = self
                    .dispatcher_tx
                    .send(DispatcherMessage::AddPreprocessor(preprocessor));
            }
            HubCommand::RegisterResponseListener {
                trigger_id,
                timeout,
                callback,
            } => {
                let _ = self.dispatcher_tx.send(DispatcherMessage::RegisterResponse {
                    trigger_id,
                    timeout,
                    callback,
                });
            }
            HubCommand::RegisterHubListener {
                event_type,
                source,
                listener,
            } => {
                if let Some(placeholder) = self.registry.get(EVENT_HUB_NAME) {
                    let _ = placeholder
                        .container
                        .tx
                        .send(ContainerMessage::RegisterListener {
                            event_type,
                            source,
                            listener,
                        });
                }
            }
            HubCommand::CreateSharedState {
                kind,
                name,
                data,
                event_id,
            } => self.handle_create_shared_state(kind, name, data, event_id),
            HubCommand::CreatePendingSharedState {
                kind,
                name,
                event_id,
                reply,
            } => {
                let version = self.handle_create_pending(kind, &name, event_id);
                let _ = reply.send(version);
            }
            HubCommand::ResolvePendingSharedState {
                kind,
                name,
                version,
                data,
            } => self.handle_resolve_pending(kind, &name, version, data),
            HubCommand::GetSharedState {
                kind,
                name,
                event_id,
                barrier,
                resolution,
                reply,
            } => {
                let result = self.handle_get_shared_state(kind, &name, event_id, barrier, resolution);
                let _ = reply.send(result);
            }
            HubCommand::GetHistoricalEvents {
                requests,
                enforce_order,
                handler,
            } => {
                self.history.get_events(requests, enforce_order, handler);
            }
            HubCommand::Shutdown { done } => {
                self.handle_shutdown();
                if let Some(done) = done {
                    let _ = done.send(());
                }
                return true;
            }
        }
        false
    }

    fn handle_dispatch(&mut self, event: Event) {
        if self.shutting_down {
            warn!(event = event.name(), "hub is shutting down, event dropped");
            return;
        }

        self.last_event_number += 1;
        let number = EventNumber::from(self.last_event_number);
        self.event_numbers.insert(event.id(), number);
        trace!(event = %event.id(), %number, "event numbered");

        let _ = self
            .dispatcher_tx
            .send(DispatcherMessage::Event(event, number));
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_complete_registration(
        &mut self,
        name: String,
        friendly_name: Option<String>,
        version: Option<String>,
        metadata: Option<HashMap<String, String>>,
        container: ContainerHandle,
        callback: Option<RegistrationCallback>,
    ) {
        if self.shutting_down {
            let _ = container.tx.send(ContainerMessage::Rejected);
            if let Some(callback) = callback {
                callback(Err(RegistrationError::Unknown));
            }
            return;
        }

        if self.registry.contains_key(&name) {
            warn!(extension = %name, "duplicate extension registration rejected");
            let _ = container.tx.send(ContainerMessage::Rejected);
            if let Some(callback) = callback {
                callback(Err(RegistrationError::DuplicateExtensionName(name)));
            }
            return;
        }

        info!(extension = %name, "extension registered");
        let _ = container.tx.send(ContainerMessage::Accepted);
        let _ = self.dispatcher_tx.send(DispatcherMessage::AddSink {
            name: name.clone(),
            tx: container.tx.clone(),
        });
        self.registry.insert(
            name,
            ExtensionRuntime::new(container, friendly_name, version, metadata),
        );
        self.publish_hub_state();

        if let Some(callback) = callback {
            callback(Ok(()));
        }
    }

    fn handle_unregister(&mut self, name: &str, callback: Option<RegistrationCallback>) {
        if name == EVENT_HUB_NAME {
            if let Some(callback) = callback {
                callback(Err(RegistrationError::ExtensionNotRegistered));
            }
            return;
        }

        match self.registry.remove(name) {
            Some(runtime) => {
                info!(extension = %name, "extension unregistered");
                let _ = runtime.container.tx.send(ContainerMessage::Shutdown);
                let _ = self.dispatcher_tx.send(DispatcherMessage::RemoveSink {
                    name: name.to_string(),
                });
                self.publish_hub_state();
                if let Some(callback) = callback {
                    callback(Ok(()));
                }
            }
            None => {
                if let Some(callback) = callback {
                    callback(Err(RegistrationError::ExtensionNotRegistered));
                }
            }
        }
    }

    fn handle_start(&mut self) {
        if self.started {
            debug!("hub already started");
            return;
        }
        info!(wrapper = %self.wrapper, "event hub started");
        self.started = true;
        let _ = self.dispatcher_tx.send(DispatcherMessage::Start);
        self.publish_hub_state();
    }

    fn handle_shutdown(&mut self) {
        info!("event hub shutting down");
        self.shutting_down = true;
        for runtime in self.registry.values() {
            let _ = runtime.container.tx.send(ContainerMessage::Shutdown);
        }
        self.registry.clear();
        let _ = self.dispatcher_tx.send(DispatcherMessage::Shutdown);
    }

    /// Chooses the version for a shared-state write: the reference
    /// event's number, else a fresh tick, else zero for a first
    /// bootstrap state.
    fn version_for_write(&mut self, manager_is_empty: bool, event_id: Option<EventId>) -> EventNumber {
        if let Some(id) = event_id {
            if let Some(number) = self.event_numbers.get(&id) {
                return *number;
            }
            warn!("reference event was never dispatched, using fallback version");
        }
        if manager_is_empty {
            EventNumber::ZERO
        } else {
            self.last_event_number += 1;
            EventNumber::from(self.last_event_number)
        }
    }

    fn handle_create_shared_state(
        &mut self,
        kind: SharedStateType,
        name: String,
        data: Value,
        event_id: Option<EventId>,
    ) {
        let Some(is_empty) = self
            .registry
            .get(&name)
            .map(|r| r.manager(kind).is_empty())
        else {
            warn!(extension = %name, "shared state for unregistered extension, ignoring");
            return;
        };

        let version = self.version_for_write(is_empty, event_id);
        let Some(runtime) = self.registry.get_mut(&name) else {
            return;
        };

        if runtime.manager_mut(kind).set_state(version, data) {
            debug!(extension = %name, %kind, %version, "shared state set");
            self.dispatch_state_change(kind, &name);
        }
    }

    fn handle_create_pending(
        &mut self,
        kind: SharedStateType,
        name: &str,
        event_id: Option<EventId>,
    ) -> Option<EventNumber> {
        let Some(is_empty) = self.registry.get(name).map(|r| r.manager(kind).is_empty()) else {
            warn!(extension = %name, "pending state for unregistered extension, ignoring");
            return None;
        };

        let version = self.version_for_write(is_empty, event_id);
        let runtime = self.registry.get_mut(name)?;

        if runtime.manager_mut(kind).set_pending_state(version) {
            debug!(extension = %name, %kind, %version, "pending shared state reserved");
            Some(version)
        } else {
            None
        }
    }

    fn handle_resolve_pending(
        &mut self,
        kind: SharedStateType,
        name: &str,
        version: EventNumber,
        data: Value,
    ) {
        let Some(runtime) = self.registry.get_mut(name) else {
            warn!(extension = %name, "pending resolution for unregistered extension, ignoring");
            return;
        };

        if runtime.manager_mut(kind).update_pending_state(version, data) {
            debug!(extension = %name, %kind, %version, "pending shared state resolved");
            self.dispatch_state_change(kind, name);
        }
    }

    fn handle_get_shared_state(
        &mut self,
        kind: SharedStateType,
        name: &str,
        event_id: Option<EventId>,
        barrier: bool,
        resolution: SharedStateResolution,
    ) -> Option<SharedStateResult> {
        let runtime = self.registry.get(name)?;

        let reference = event_id.and_then(|id| self.event_numbers.get(&id).copied());
        let version = reference.unwrap_or(EventNumber::LATEST);

        let manager = runtime.manager(kind);
        let mut result = match resolution {
            SharedStateResolution::Any => manager.resolve(version),
            SharedStateResolution::LastSet => manager.resolve_last_set(version),
        };

        // Barrier: a SET result only counts once the owner has observed
        // everything strictly before the reference event.
        if barrier && result.is_set() {
            if let Some(reference) = reference {
                let processed =
                    EventNumber::from(runtime.container.last_processed.load(Ordering::SeqCst));
                if processed < reference.prev() {
                    trace!(
                        extension = %name,
                        %reference,
                        %processed,
                        "barrier read downgraded to pending"
                    );
                    result = SharedStateResult::pending(result.value);
                }
            }
        }

        Some(result)
    }

    /// Dispatches the internal state-change notification for `owner`.
    fn dispatch_state_change(&mut self, kind: SharedStateType, owner: &str) {
        let (event_name, source) = match kind {
            SharedStateType::Standard => ("Shared state change", event_source::SHARED_STATE),
            SharedStateType::Xdm => ("Shared state change (XDM)", event_source::XDM_SHARED_STATE),
        };
        let event = Event::new(event_name, event_type::HUB, source)
            .with_data(json!({ data_key::STATE_OWNER: owner }));
        self.handle_dispatch(event);
    }

    /// Publishes the hub's registry snapshot, once started.
    fn publish_hub_state(&mut self) {
        if !self.started {
            return;
        }

        let mut extensions = serde_json::Map::new();
        for (name, runtime) in &self.registry {
            if name == EVENT_HUB_NAME {
                continue;
            }
            let mut entry = serde_json::Map::new();
            entry.insert(
                "friendlyName".to_string(),
                json!(runtime.friendly_name.clone().unwrap_or_else(|| name.clone())),
            );
            entry.insert(
                "version".to_string(),
                json!(runtime.version.clone().unwrap_or_default()),
            );
            if let Some(metadata) = &runtime.metadata {
                entry.insert("metadata".to_string(), json!(metadata));
            }
            extensions.insert(name.clone(), Value::Object(entry));
        }

        let payload = json!({
            "version": env!("CARGO_PKG_VERSION"),
            "wrapper": {
                "type": self.wrapper.tag(),
                "friendlyName": self.wrapper.friendly_name(),
            },
            "extensions": extensions,
        });

        self.handle_create_shared_state(
            SharedStateType::Standard,
            EVENT_HUB_NAME.to_string(),
            payload,
            None,
        );
    }
}
