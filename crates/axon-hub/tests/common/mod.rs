//! Shared helpers for the hub integration suites.
#![allow(dead_code)]

use axon_event::Event;
use axon_extension::testing::ScriptedExtension;
use axon_extension::{
    EventListener, ExtensionApi, ExtensionFactory, RegistrationCallback, RegistrationError,
};
use axon_hub::EventHub;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

/// Event type/source used by most scenarios.
pub const TYPE: &str = "com.test.eventType.demo";
pub const SOURCE: &str = "com.test.eventSource.demo";

/// Installs a compact subscriber so `RUST_LOG` works under the test
/// runner. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Polls `cond` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// Collects delivered events for assertions.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener pushing every delivered event into this recorder.
    pub fn listener(&self) -> EventListener {
        let events = Arc::clone(&self.events);
        Arc::new(move |event| {
            events.lock().expect("lock").push(event.clone());
        })
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock").len()
    }

    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("lock")
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock").clone()
    }
}

/// Slot a factory fills with the api handle so the test can drive the
/// extension from outside.
pub type ApiSlot = Arc<Mutex<Option<Arc<dyn ExtensionApi>>>>;

pub fn api_slot() -> ApiSlot {
    Arc::default()
}

pub fn api_of(slot: &ApiSlot) -> Arc<dyn ExtensionApi> {
    Arc::clone(
        slot.lock()
            .expect("lock")
            .as_ref()
            .expect("factory has run"),
    )
}

/// Factory building a [`ScriptedExtension`] that records `(TYPE, SOURCE)`
/// events into `recorder` and exposes its api through `slot`.
pub fn recording_extension(
    name: &'static str,
    recorder: &Recorder,
    slot: &ApiSlot,
) -> ExtensionFactory {
    let recorder = recorder.clone();
    let slot = Arc::clone(slot);
    Box::new(move |api| {
        *slot.lock().expect("lock") = Some(Arc::clone(&api));
        api.register_event_listener(TYPE, SOURCE, recorder.listener());
        Ok(Box::new(ScriptedExtension::new(name)))
    })
}

/// Factory building a bare [`ScriptedExtension`] exposing its api.
pub fn plain_extension(name: &'static str, slot: &ApiSlot) -> ExtensionFactory {
    let slot = Arc::clone(slot);
    Box::new(move |api| {
        *slot.lock().expect("lock") = Some(api);
        Ok(Box::new(ScriptedExtension::new(name)))
    })
}

/// Registers `factories` and resolves once the hub has started.
pub async fn register_and_start(hub: &EventHub, factories: Vec<ExtensionFactory>) {
    init_tracing();
    let (tx, rx) = oneshot::channel();
    hub.register_extensions(
        factories,
        Some(Box::new(move || {
            let _ = tx.send(());
        })),
    );
    rx.await.expect("hub started");
}

/// Callback + receiver pair for observing a registration outcome.
pub fn registration_probe() -> (
    RegistrationCallback,
    oneshot::Receiver<Result<(), RegistrationError>>,
) {
    let (tx, rx) = oneshot::channel();
    (
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
        rx,
    )
}

/// A demo event with the shared type/source tags.
pub fn demo_event(name: &str) -> Event {
    Event::new(name, TYPE, SOURCE)
}

/// Polls a shared-state read until `pred` accepts the result or
/// `timeout` elapses; returns the last read either way.
#[allow(clippy::too_many_arguments)]
pub async fn wait_for_state(
    hub: &EventHub,
    kind: axon_extension::SharedStateType,
    name: &str,
    event: Option<&Event>,
    barrier: bool,
    resolution: axon_extension::SharedStateResolution,
    timeout: Duration,
    mut pred: impl FnMut(&axon_extension::SharedStateResult) -> bool,
) -> Option<axon_extension::SharedStateResult> {
    let deadline = Instant::now() + timeout;
    loop {
        let result = hub
            .get_shared_state(kind, name, event, barrier, resolution)
            .await;
        if let Some(current) = &result {
            if pred(current) {
                return result;
            }
        }
        if Instant::now() >= deadline {
            return result;
        }
        sleep(Duration::from_millis(10)).await;
    }
}
