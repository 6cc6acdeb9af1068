//! ExtensionContainer - per-extension serial queue.
//!
//! Each registered extension is owned by exactly one container task.
//! The task constructs the extension, negotiates acceptance with the
//! hub writer, then drains the inbox one event at a time:
//!
//! ```text
//! spawn(factory) ──► factory(api) ──► report identity to hub
//!                                          │
//!                         Rejected ◄───────┴───────► Accepted
//!                            │                          │ on_registered()
//!                          (exit)                       ▼
//!                                          ┌──── drain loop ────┐
//!                                          │ paused? wait       │
//!                                          │ ready_for_event?   │──false──► head parked,
//!                                          │ listeners fire     │           retry on stimulus
//!                                          │ last_processed = n │
//!                                          └────────────────────┘
//! ```
//!
//! # Rules
//!
//! - Events are delivered in hub order; a not-ready head is never
//!   dropped or bypassed
//! - Pausing parks the loop without advancing the queue; control
//!   messages still apply
//! - Extension code (factory, lifecycle, readiness, listeners) runs
//!   only on this task, behind panic guards

use crate::hub::HubCommand;
use axon_event::Event;
use axon_extension::{
    EventListener, Extension, ExtensionFactory, RegistrationCallback, RegistrationError,
};
use axon_types::EventNumber;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

/// How long a parked head waits before re-asking `ready_for_event`
/// without any new stimulus.
const READINESS_RETRY: std::time::Duration = std::time::Duration::from_millis(100);

/// Message into a container task.
pub(crate) enum ContainerMessage {
    /// A numbered event for delivery.
    Event(Event, EventNumber),
    /// Add a listener to this extension's table.
    RegisterListener {
        event_type: String,
        source: String,
        listener: EventListener,
    },
    /// Resume event delivery.
    StartEvents,
    /// Pause event delivery; events keep queueing.
    StopEvents,
    /// The hub accepted the registration.
    Accepted,
    /// The hub rejected the registration; tear down silently.
    Rejected,
    /// Unregistration or hub shutdown; finish the in-flight delivery,
    /// notify the extension, exit.
    Shutdown,
}

/// Hub-side handle on a container.
#[derive(Clone)]
pub(crate) struct ContainerHandle {
    pub(crate) tx: mpsc::UnboundedSender<ContainerMessage>,
    /// Number of the last event this extension consumed; read by the
    /// hub writer for barrier evaluation.
    pub(crate) last_processed: Arc<AtomicU64>,
}

/// Registered listener row.
struct ListenerEntry {
    event_type: String,
    source: String,
    listener: EventListener,
}

/// Listener table with exact-triple idempotence.
#[derive(Default)]
struct ListenerTable {
    entries: Vec<ListenerEntry>,
}

impl ListenerTable {
    /// Adds an entry unless the exact same triple is already present.
    fn add(&mut self, event_type: String, source: String, listener: EventListener) -> bool {
        let duplicate = self.entries.iter().any(|e| {
            e.event_type == event_type && e.source == source && Arc::ptr_eq(&e.listener, &listener)
        });
        if duplicate {
            return false;
        }
        self.entries.push(ListenerEntry {
            event_type,
            source,
            listener,
        });
        true
    }

    /// Listeners whose pattern matches `event`, in registration order.
    fn matching<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a EventListener> + 'a {
        self.entries
            .iter()
            .filter(move |e| event.matches(&e.event_type, &e.source))
            .map(|e| &e.listener)
    }
}

/// Spawns the container for a factory-built extension.
///
/// The factory runs on the container task. Construction failures and
/// blank names resolve the callback directly; otherwise the container
/// reports its identity to the hub and awaits accept/reject.
pub(crate) fn spawn(
    factory: ExtensionFactory,
    hub_tx: mpsc::UnboundedSender<HubCommand>,
    callback: Option<RegistrationCallback>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let last_processed = Arc::new(AtomicU64::new(0));
    let name_cell: Arc<OnceLock<String>> = Arc::new(OnceLock::new());

    let api: Arc<dyn axon_extension::ExtensionApi> = Arc::new(crate::hub::api::HubExtensionApi::new(
        hub_tx.clone(),
        tx.clone(),
        Arc::clone(&name_cell),
    ));

    let handle = ContainerHandle {
        tx: tx.clone(),
        last_processed: Arc::clone(&last_processed),
    };

    tokio::spawn(async move {
        let extension = match catch_unwind(AssertUnwindSafe(move || factory(api))) {
            Ok(Ok(extension)) => extension,
            Ok(Err(err)) => {
                warn!(%err, "extension construction failed");
                complete(
                    callback,
                    Err(RegistrationError::ExtensionInitializationFailure(
                        err.to_string(),
                    )),
                );
                return;
            }
            Err(_) => {
                warn!("extension factory panicked");
                complete(
                    callback,
                    Err(RegistrationError::ExtensionInitializationFailure(
                        "factory panicked".into(),
                    )),
                );
                return;
            }
        };

        let name = extension.name().to_string();
        if name.trim().is_empty() {
            warn!("extension reported a blank name");
            complete(callback, Err(RegistrationError::InvalidExtensionName));
            return;
        }
        let _ = name_cell.set(name.clone());

        let friendly_name = extension.friendly_name().map(ToString::to_string);
        let version = extension.version().map(ToString::to_string);
        let metadata = extension.metadata();

        let mut container = Container::new(extension, name.clone(), rx, last_processed);

        if hub_tx
            .send(HubCommand::CompleteRegistration {
                name,
                friendly_name,
                version,
                metadata,
                container: handle,
                callback,
            })
            .is_err()
        {
            debug!("hub dropped before registration completed");
            return;
        }

        if container.await_acceptance().await {
            container.run().await;
        }
    });
}

/// Spawns a container around an already-built extension, bypassing the
/// registration handshake. Used for the hub's internal placeholder.
pub(crate) fn spawn_prebuilt(extension: Box<dyn Extension>) -> ContainerHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let last_processed = Arc::new(AtomicU64::new(0));
    let handle = ContainerHandle {
        tx,
        last_processed: Arc::clone(&last_processed),
    };

    let name = extension.name().to_string();
    let mut container = Container::new(extension, name, rx, last_processed);
    tokio::spawn(async move {
        container.notify_registered();
        container.run().await;
    });

    handle
}

fn complete(callback: Option<RegistrationCallback>, result: Result<(), RegistrationError>) {
    if let Some(callback) = callback {
        callback(result);
    }
}

struct Container {
    extension: Box<dyn Extension>,
    name: String,
    rx: mpsc::UnboundedReceiver<ContainerMessage>,
    listeners: ListenerTable,
    queue: VecDeque<(Event, EventNumber)>,
    paused: bool,
    head_blocked: bool,
    last_processed: Arc<AtomicU64>,
}

impl Container {
    fn new(
        extension: Box<dyn Extension>,
        name: String,
        rx: mpsc::UnboundedReceiver<ContainerMessage>,
        last_processed: Arc<AtomicU64>,
    ) -> Self {
        Self {
            extension,
            name,
            rx,
            listeners: ListenerTable::default(),
            queue: VecDeque::new(),
            paused: false,
            head_blocked: false,
            last_processed,
        }
    }

    /// Initialization phase: apply control messages until the hub
    /// accepts or rejects. Returns `true` on acceptance.
    async fn await_acceptance(&mut self) -> bool {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                ContainerMessage::Accepted => {
                    self.notify_registered();
                    return true;
                }
                ContainerMessage::Rejected => {
                    debug!(extension = %self.name, "registration rejected, discarding container");
                    return false;
                }
                ContainerMessage::RegisterListener {
                    event_type,
                    source,
                    listener,
                } => self.add_listener(event_type, source, listener),
                ContainerMessage::StartEvents => self.paused = false,
                ContainerMessage::StopEvents => self.paused = true,
                ContainerMessage::Shutdown => return false,
                // Fan-out is wired only after acceptance.
                ContainerMessage::Event(..) => {}
            }
        }
        false
    }

    async fn run(&mut self) {
        info!(extension = %self.name, "extension container running");

        loop {
            self.drain();

            let msg = if self.head_blocked && !self.paused {
                match timeout(READINESS_RETRY, self.rx.recv()).await {
                    Ok(msg) => msg,
                    // Retry tick: re-ask readiness with no new stimulus.
                    Err(_) => continue,
                }
            } else {
                self.rx.recv().await
            };

            match msg {
                None => break,
                Some(ContainerMessage::Event(event, number)) => {
                    self.queue.push_back((event, number));
                }
                Some(ContainerMessage::RegisterListener {
                    event_type,
                    source,
                    listener,
                }) => self.add_listener(event_type, source, listener),
                Some(ContainerMessage::StartEvents) => {
                    self.paused = false;
                }
                Some(ContainerMessage::StopEvents) => {
                    debug!(extension = %self.name, "events stopped");
                    self.paused = true;
                }
                Some(ContainerMessage::Shutdown) => {
                    if !self.queue.is_empty() {
                        debug!(
                            extension = %self.name,
                            dropped = self.queue.len(),
                            "shutting down with undelivered events"
                        );
                    }
                    self.notify_unregistered();
                    break;
                }
                Some(ContainerMessage::Accepted | ContainerMessage::Rejected) => {}
            }
        }

        info!(extension = %self.name, "extension container stopped");
    }

    /// Delivers queued events until the queue empties, the head is not
    /// ready, or delivery is paused.
    fn drain(&mut self) {
        self.head_blocked = false;
        if self.paused {
            return;
        }

        while let Some((event, number)) = self.queue.pop_front() {
            if !self.ready_for(&event) {
                trace!(
                    extension = %self.name,
                    event = %event.id(),
                    "head not ready, parking"
                );
                self.queue.push_front((event, number));
                self.head_blocked = true;
                return;
            }

            self.deliver(&event);
            self.last_processed.store(number.value(), Ordering::SeqCst);
        }
    }

    fn add_listener(&mut self, event_type: String, source: String, listener: EventListener) {
        if !self.listeners.add(event_type.clone(), source.clone(), listener) {
            debug!(
                extension = %self.name,
                event_type, source,
                "listener already registered, ignoring"
            );
        }
    }

    /// Asks the extension whether the head may be delivered. A panic in
    /// the check counts as ready so a broken extension cannot wedge its
    /// own queue.
    fn ready_for(&mut self, event: &Event) -> bool {
        let extension = &mut self.extension;
        match catch_unwind(AssertUnwindSafe(|| extension.ready_for_event(event))) {
            Ok(ready) => ready,
            Err(_) => {
                warn!(extension = %self.name, "ready_for_event panicked, treating as ready");
                true
            }
        }
    }

    fn deliver(&self, event: &Event) {
        for listener in self.listeners.matching(event) {
            if catch_unwind(AssertUnwindSafe(|| (listener)(event))).is_err() {
                warn!(
                    extension = %self.name,
                    event = %event.id(),
                    "event listener panicked"
                );
            }
        }
    }

    fn notify_registered(&mut self) {
        let extension = &mut self.extension;
        if catch_unwind(AssertUnwindSafe(|| extension.on_registered())).is_err() {
            warn!(extension = %self.name, "on_registered panicked");
        }
    }

    fn notify_unregistered(&mut self) {
        let extension = &mut self.extension;
        if catch_unwind(AssertUnwindSafe(|| extension.on_unregistered())).is_err() {
            warn!(extension = %self.name, "on_unregistered panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn noop_listener() -> EventListener {
        Arc::new(|_| {})
    }

    #[test]
    fn listener_table_rejects_exact_duplicates() {
        let mut table = ListenerTable::default();
        let listener = noop_listener();

        assert!(table.add("t".into(), "s".into(), Arc::clone(&listener)));
        assert!(!table.add("t".into(), "s".into(), Arc::clone(&listener)));
        assert_eq!(table.entries.len(), 1);
    }

    #[test]
    fn same_pattern_different_handler_is_kept() {
        let mut table = ListenerTable::default();

        assert!(table.add("t".into(), "s".into(), noop_listener()));
        assert!(table.add("t".into(), "s".into(), noop_listener()));
        assert_eq!(table.entries.len(), 2);
    }

    #[test]
    fn matching_respects_wildcards_and_case() {
        let mut table = ListenerTable::default();
        table.add("com.axon.eventType.generic".into(), "src".into(), noop_listener());
        table.add("*".into(), "other".into(), noop_listener());

        let event = Event::new("e", "COM.AXON.EVENTTYPE.GENERIC", "SRC");
        assert_eq!(table.matching(&event).count(), 1);

        let other = Event::new("e", "anything", "other");
        assert_eq!(table.matching(&other).count(), 1);

        let neither = Event::new("e", "anything", "nowhere");
        assert_eq!(table.matching(&neither).count(), 0);
    }

    #[test]
    fn matching_preserves_registration_order() {
        let order: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let mut table = ListenerTable::default();

        for tag in [1u8, 2, 3] {
            let sink = Arc::clone(&order);
            table.add(
                "*".into(),
                "*".into(),
                Arc::new(move |_| sink.lock().expect("lock").push(tag)),
            );
        }

        let event = Event::new("e", "t", "s");
        for listener in table.matching(&event) {
            (listener)(&event);
        }
        assert_eq!(order.lock().expect("lock").as_slice(), &[1, 2, 3]);
    }
}
