//! Event hub core - ingress, dispatch, and shared-state coordination.
//!
//! # Architecture Overview
//!
//! ```text
//! producers / extensions
//!        │ dispatch(e)
//!        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        hub writer                            │
//! │   - assigns EventNumber, records id → number                 │
//! │   - extension registry and lifecycle                         │
//! │   - shared-state writes and reads (versioned managers)       │
//! └──────────────────────────────────────────────────────────────┘
//!        │ (event, number)
//!        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     dispatcher writer                        │
//! │   - preprocessors (insertion order)                          │
//! │   - response-listener routing (timeout cancellation)         │
//! │   - fan-out to extension inboxes                             │
//! │   - event-history submission (mask present)                  │
//! └──────────────────────────────────────────────────────────────┘
//!        │ broadcast
//!        ├──────────────┬──────────────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//!  │container │   │container │   │container │   │container │
//!  │ (serial) │   │ (serial) │   │ (serial) │   │ (serial) │
//!  └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Main Types
//!
//! - [`EventHub`]: the cloneable handle producers and hosts use
//! - [`ResponseCallback`]: response-event correlation callback
//! - [`WrapperType`]: pre-start wrapper tag
//! - [`HubError`]: hub layer errors (implements
//!   [`ErrorCode`](axon_types::ErrorCode))

pub(crate) mod api;
mod completion;
mod dispatcher;
mod error;
#[allow(clippy::module_inception)]
mod hub;
mod wrapper;

pub use completion::{ResponseCallback, ResponseError};
pub use error::HubError;
pub use hub::EventHub;
pub use wrapper::WrapperType;

pub(crate) use hub::HubCommand;
