//! Extension SDK for the Axon event hub.
//!
//! This crate defines the contract between the hub runtime and the
//! extensions that plug into it: the [`Extension`] trait an extension
//! implements, and the [`ExtensionApi`] façade it is handed at
//! construction.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                      │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axon-types     : EventId, EventNumber, ErrorCode           │
//! │  axon-event     : Event, names, history                     │
//! │  axon-extension : Extension, ExtensionApi  ◄── HERE         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # How an extension runs
//!
//! Each registered extension owns a private serial queue inside the hub.
//! Its constructor, lifecycle callbacks, readiness checks and event
//! listeners all run on that one queue, so an extension never needs
//! interior locking for its own state:
//!
//! ```text
//! hub ──register(factory)──► container task
//!                                │ factory(api) builds the extension
//!                                │ on_registered()
//!                                ▼
//!                       ┌─── drain loop ───┐
//!                       │ ready_for_event? │──false──► head stays, retry
//!                       │ listeners fire   │
//!                       │ next event       │
//!                       └──────────────────┘
//! ```
//!
//! # Shared state
//!
//! Extensions publish versioned snapshots through
//! [`ExtensionApi::create_shared_state`] and read other extensions'
//! snapshots with [`ExtensionApi::get_shared_state`] (or, from listener
//! handlers and readiness checks, the synchronous
//! [`ExtensionApi::blocking_get_shared_state`]). Reads are pinned to an
//! event: the version resolved is the newest snapshot at or below that
//! event's number, which makes reads reproducible no matter when they
//! execute.
//!
//! # Example
//!
//! ```
//! use axon_extension::{Extension, ExtensionApi};
//! use axon_event::Event;
//! use std::sync::Arc;
//!
//! struct Profile;
//!
//! impl Extension for Profile {
//!     fn name(&self) -> &str {
//!         "com.example.profile"
//!     }
//!
//!     fn friendly_name(&self) -> Option<&str> {
//!         Some("Profile")
//!     }
//! }
//!
//! fn build(api: Arc<dyn ExtensionApi>) -> Profile {
//!     api.register_event_listener(
//!         "com.axon.eventType.generic",
//!         "*",
//!         Arc::new(|event: &Event| {
//!             let _ = event;
//!         }),
//!     );
//!     Profile
//! }
//! ```

mod api;
mod error;
mod extension;
mod shared_state;
pub mod testing;

pub use api::ExtensionApi;
pub use error::{ExtensionError, RegistrationError};
pub use extension::{EventListener, Extension, ExtensionFactory, RegistrationCallback};
pub use shared_state::{
    PendingResolution, SharedStateResolution, SharedStateResult, SharedStateStatus,
    SharedStateType,
};
