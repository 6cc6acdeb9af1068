//! Concrete `ExtensionApi` backed by the hub writers.
//!
//! One instance is created per container and handed to the extension
//! factory. Fire-and-forget operations send a message; reads round-trip
//! with a oneshot reply. The extension's canonical name is filled in
//! after construction, so state operations issued before the extension
//! is fully initialized are logged and dropped.

use crate::container::ContainerMessage;
use crate::hub::HubCommand;
use async_trait::async_trait;
use axon_event::{Event, EventHistoryRequest, EventHistoryResultHandler};
use axon_extension::{
    EventListener, ExtensionApi, PendingResolution, SharedStateResolution, SharedStateResult,
    SharedStateType,
};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

pub(crate) struct HubExtensionApi {
    hub_tx: mpsc::UnboundedSender<HubCommand>,
    container_tx: mpsc::UnboundedSender<ContainerMessage>,
    /// Filled once construction succeeds; empty while the factory runs.
    name: Arc<OnceLock<String>>,
}

impl HubExtensionApi {
    pub(crate) fn new(
        hub_tx: mpsc::UnboundedSender<HubCommand>,
        container_tx: mpsc::UnboundedSender<ContainerMessage>,
        name: Arc<OnceLock<String>>,
    ) -> Self {
        Self {
            hub_tx,
            container_tx,
            name,
        }
    }

    fn owner(&self, operation: &str) -> Option<String> {
        match self.name.get() {
            Some(name) => Some(name.clone()),
            None => {
                warn!(operation, "extension not fully initialized, ignoring");
                None
            }
        }
    }
}

#[async_trait]
impl ExtensionApi for HubExtensionApi {
    fn register_event_listener(&self, event_type: &str, source: &str, listener: EventListener) {
        let _ = self.container_tx.send(ContainerMessage::RegisterListener {
            event_type: event_type.to_string(),
            source: source.to_string(),
            listener,
        });
    }

    fn dispatch(&self, event: Event) {
        let _ = self.hub_tx.send(HubCommand::Dispatch(event));
    }

    fn start_events(&self) {
        let _ = self.container_tx.send(ContainerMessage::StartEvents);
    }

    fn stop_events(&self) {
        let _ = self.container_tx.send(ContainerMessage::StopEvents);
    }

    fn create_shared_state(&self, kind: SharedStateType, state: Value, event: Option<&Event>) {
        let Some(name) = self.owner("create_shared_state") else {
            return;
        };
        let _ = self.hub_tx.send(HubCommand::CreateSharedState {
            kind,
            name,
            data: state,
            event_id: event.map(Event::id),
        });
    }

    async fn create_pending_shared_state(
        &self,
        kind: SharedStateType,
        event: Option<&Event>,
    ) -> Option<PendingResolution> {
        let name = self.owner("create_pending_shared_state")?;
        let (reply_tx, reply_rx) = oneshot::channel();

        self.hub_tx
            .send(HubCommand::CreatePendingSharedState {
                kind,
                name: name.clone(),
                event_id: event.map(Event::id),
                reply: reply_tx,
            })
            .ok()?;

        let version = reply_rx.await.ok()??;

        let hub_tx = self.hub_tx.clone();
        Some(PendingResolution::new(Arc::new(move |data: Value| {
            if hub_tx
                .send(HubCommand::ResolvePendingSharedState {
                    kind,
                    name: name.clone(),
                    version,
                    data,
                })
                .is_err()
            {
                debug!("hub gone, pending resolution dropped");
            }
        })))
    }

    async fn get_shared_state(
        &self,
        kind: SharedStateType,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
        resolution: SharedStateResolution,
    ) -> Option<SharedStateResult> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.hub_tx
            .send(HubCommand::GetSharedState {
                kind,
                name: extension_name.to_string(),
                event_id: event.map(Event::id),
                barrier,
                resolution,
                reply: reply_tx,
            })
            .ok()?;

        reply_rx.await.ok()?
    }

    fn unregister_extension(&self) {
        let Some(name) = self.owner("unregister_extension") else {
            return;
        };
        let _ = self.hub_tx.send(HubCommand::UnregisterExtension {
            name,
            callback: None,
        });
    }

    fn get_historical_events(
        &self,
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    ) {
        let _ = self.hub_tx.send(HubCommand::GetHistoricalEvents {
            requests,
            enforce_order,
            handler,
        });
    }
}
