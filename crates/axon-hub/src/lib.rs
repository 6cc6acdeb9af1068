//! Axon event hub runtime.
//!
//! This crate is the internal runtime behind the Axon SDK: the event
//! dispatch core, the per-extension containers, and the shared-state
//! coordination layer. Extensions should depend on the SDK crates
//! (`axon-types`, `axon-event`, `axon-extension`); hosts embed this one.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                      │
//! │  axon-types / axon-event / axon-extension                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Runtime Layer (THIS CRATE)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  hub/          : EventHub, dispatcher, response listeners   │
//! │  container     : per-extension serial queue                 │
//! │  shared_state  : versioned snapshot manager                 │
//! │  history       : event-history collaborator                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency model
//!
//! The runtime is a set of single-writer tasks connected by channels.
//! No piece of mutable state is touched from more than one task:
//!
//! | Writer | Owns |
//! |--------|------|
//! | hub | event numbering, extension registry, shared-state managers |
//! | dispatcher | preprocessor pipeline, response routing, fan-out |
//! | container (one per extension) | inbox, listener table, run state |
//! | completion workers (bounded) | response callback invocation |
//!
//! Producers and extensions talk to the writers by sending messages;
//! reads that need an answer round-trip with a oneshot reply.
//!
//! # Example
//!
//! ```no_run
//! use axon_event::Event;
//! use axon_extension::testing::ScriptedExtension;
//! use axon_hub::EventHub;
//!
//! # async fn run() {
//! let hub = EventHub::new();
//! hub.register_extension(
//!     Box::new(|_api| Ok(Box::new(ScriptedExtension::new("com.example.profile")))),
//!     None,
//! );
//! hub.start();
//! hub.dispatch(Event::new("Launch", "com.axon.eventType.generic", "com.axon.eventSource.requestContent"));
//! # }
//! ```

mod container;
pub mod history;
mod hub;
mod preprocessor;
mod shared_state;

pub use history::{EventHistory, InMemoryEventHistory, RecordCompletion};
pub use hub::{EventHub, HubError, ResponseCallback, ResponseError, WrapperType};
pub use preprocessor::EventPreprocessor;
pub use shared_state::SharedStateManager;
