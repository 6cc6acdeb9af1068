//! Dispatcher writer - preprocessing, response routing, fan-out.
//!
//! The dispatcher is the single consumer of the preprocessor channel.
//! For each numbered event it:
//!
//! 1. Runs the registered preprocessors in insertion order
//! 2. Routes response events to the completion table
//! 3. Broadcasts to every registered extension inbox
//! 4. Submits masked events to the event-history collaborator
//!
//! Events dispatched before `start()` are buffered here and drained in
//! order once the hub starts. Registry changes arrive on the same
//! channel as events, both sent by the hub writer, so a container never
//! observes a suffix of the stream out of order.

use super::completion::{CompletionHandlers, ResponseCallback};
use crate::container::ContainerMessage;
use crate::history::EventHistory;
use crate::preprocessor::EventPreprocessor;
use axon_event::Event;
use axon_types::{EventId, EventNumber};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Message into the dispatcher task.
pub(crate) enum DispatcherMessage {
    /// A numbered event from the hub writer.
    Event(Event, EventNumber),
    /// Wire a container into the broadcast set.
    AddSink {
        name: String,
        tx: mpsc::UnboundedSender<ContainerMessage>,
    },
    /// Remove a container from the broadcast set.
    RemoveSink { name: String },
    /// Append a preprocessor to the pipeline.
    AddPreprocessor(Box<dyn EventPreprocessor>),
    /// Register a response listener with a deadline.
    RegisterResponse {
        trigger_id: EventId,
        timeout: Duration,
        callback: Arc<dyn ResponseCallback>,
    },
    /// A response deadline fired.
    ResponseTimeout { trigger_id: EventId },
    /// Begin draining buffered events.
    Start,
    /// Fail outstanding response listeners and exit.
    Shutdown,
}

struct Sink {
    name: String,
    tx: mpsc::UnboundedSender<ContainerMessage>,
}

/// Runs the dispatcher until shutdown.
pub(crate) async fn run(
    mut rx: mpsc::UnboundedReceiver<DispatcherMessage>,
    self_tx: mpsc::UnboundedSender<DispatcherMessage>,
    history: Arc<dyn EventHistory>,
) {
    let mut sinks: Vec<Sink> = Vec::new();
    let mut preprocessors: Vec<Box<dyn EventPreprocessor>> = Vec::new();
    let mut completions = CompletionHandlers::new();
    let mut backlog: VecDeque<(Event, EventNumber)> = VecDeque::new();
    let mut started = false;

    while let Some(msg) = rx.recv().await {
        match msg {
            DispatcherMessage::Event(event, number) => {
                if started {
                    process_event(
                        event,
                        number,
                        &mut preprocessors,
                        &mut completions,
                        &sinks,
                        &history,
                    );
                } else {
                    backlog.push_back((event, number));
                }
            }
            DispatcherMessage::Start => {
                started = true;
                if !backlog.is_empty() {
                    debug!(buffered = backlog.len(), "draining pre-start backlog");
                }
                while let Some((event, number)) = backlog.pop_front() {
                    process_event(
                        event,
                        number,
                        &mut preprocessors,
                        &mut completions,
                        &sinks,
                        &history,
                    );
                }
            }
            DispatcherMessage::AddSink { name, tx } => {
                sinks.retain(|s| s.name != name);
                sinks.push(Sink { name, tx });
            }
            DispatcherMessage::RemoveSink { name } => {
                sinks.retain(|s| s.name != name);
            }
            DispatcherMessage::AddPreprocessor(preprocessor) => {
                preprocessors.push(preprocessor);
            }
            DispatcherMessage::RegisterResponse {
                trigger_id,
                timeout,
                callback,
            } => {
                completions.register(trigger_id, timeout, callback, self_tx.clone());
            }
            DispatcherMessage::ResponseTimeout { trigger_id } => {
                completions.timeout(trigger_id);
            }
            DispatcherMessage::Shutdown => {
                completions.fail_all();
                break;
            }
        }
    }

    debug!("dispatcher stopped");
}

fn process_event(
    event: Event,
    number: EventNumber,
    preprocessors: &mut [Box<dyn EventPreprocessor>],
    completions: &mut CompletionHandlers,
    sinks: &[Sink],
    history: &Arc<dyn EventHistory>,
) {
    let mut event = event;
    for preprocessor in preprocessors.iter_mut() {
        match catch_unwind(AssertUnwindSafe(|| preprocessor.process(event))) {
            Ok(Ok(transformed)) => event = transformed,
            Ok(Err(err)) => {
                // The number stays consumed; only fan-out is skipped.
                warn!(%number, %err, "preprocessor failed, dropping event");
                return;
            }
            Err(_) => {
                warn!(%number, "preprocessor panicked, dropping event");
                return;
            }
        }
    }

    trace!(event = %event.id(), %number, name = event.name(), "dispatching");

    if let Some(trigger_id) = event.response_id() {
        completions.resolve(trigger_id, &event);
    }

    for sink in sinks {
        if sink
            .tx
            .send(ContainerMessage::Event(event.clone(), number))
            .is_err()
        {
            debug!(extension = %sink.name, "inbox closed, skipping");
        }
    }

    if event.mask().is_some() {
        history.record_event(
            &event,
            Box::new(move |stored| {
                if !stored {
                    warn!(%number, "event history refused record");
                }
            }),
        );
    }
}
