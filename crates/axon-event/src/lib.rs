//! Event types for the Axon event hub.
//!
//! This crate provides the immutable [`Event`] value that flows through
//! the hub, the well-known type/source name constants used for routing,
//! and the event-history request/fingerprint primitives.
//!
//! # Crate Architecture
//!
//! This crate is part of the **Extension SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                      │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axon-types     : EventId, EventNumber, ErrorCode           │
//! │  axon-event     : Event, names, history  ◄── HERE           │
//! │  axon-extension : Extension trait, ExtensionApi façade      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event Flow Overview
//!
//! Every producer call and every extension dispatch funnels into the
//! hub's single ingress:
//!
//! ```text
//! producer ──dispatch(e)──► EventHub
//!                              │  assign EventNumber
//!                              ▼
//!                        preprocessors
//!                              │
//!            ┌─────────────────┼──────────────────┐
//!            ▼                 ▼                  ▼
//!     response routing   extension inboxes   event history
//!     (response_id set)  (broadcast, FIFO)   (mask present)
//! ```
//!
//! Events are immutable once constructed. Rule-driven transforms use
//! [`Event::cloned_with_data`], which keeps the identity and replaces
//! only the payload.
//!
//! # Usage
//!
//! ```
//! use axon_event::Event;
//! use serde_json::json;
//!
//! let trigger = Event::new("Profile update", "com.axon.eventType.generic", "com.axon.eventSource.requestContent")
//!     .with_data(json!({ "profile": { "name": "anna" } }));
//!
//! let response = Event::new_response_to("Profile updated", &trigger)
//!     .with_data(json!({ "ok": true }));
//!
//! assert_eq!(response.response_id(), Some(trigger.id()));
//! ```

mod event;
pub mod history;
pub mod names;

pub use event::Event;
pub use history::{EventHistoryRequest, EventHistoryResultHandler};

// Re-export identifier types; nearly every user of Event needs them.
pub use axon_types::{EventId, EventNumber};
