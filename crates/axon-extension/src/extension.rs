//! The `Extension` trait and its registration types.
//!
//! An extension is a self-contained module that plugs into the hub:
//! it listens for events, publishes shared state, and may dispatch new
//! events. The hub runs every extension on its own serial queue, so all
//! trait methods take `&mut self` and implementations need no internal
//! locking.

use crate::error::RegistrationError;
use crate::ExtensionApi;
use axon_event::Event;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler invoked for events matching a listener registration.
///
/// Handlers run serially on the owning extension's queue. A handler
/// that panics is caught and logged; it never unwinds into the queue.
pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Builds an extension instance, given the API façade it will use.
///
/// The factory runs on the extension's own queue. Returning an error
/// surfaces as [`RegistrationError::ExtensionInitializationFailure`].
pub type ExtensionFactory = Box<
    dyn FnOnce(Arc<dyn ExtensionApi>) -> Result<Box<dyn Extension>, crate::ExtensionError>
        + Send
        + 'static,
>;

/// Callback receiving the outcome of a registration or deregistration.
pub type RegistrationCallback = Box<dyn FnOnce(Result<(), RegistrationError>) + Send + 'static>;

/// An event hub extension.
///
/// # Required Methods
///
/// Only [`name`](Self::name) is required; everything else has a neutral
/// default.
///
/// | Method | Purpose |
/// |--------|---------|
/// | `name` | Canonical identity; shared-state lookups key on it |
/// | `friendly_name` | Display name for the hub registry snapshot |
/// | `version` / `metadata` | Reported in the hub registry snapshot |
/// | `on_registered` / `on_unregistered` | Lifecycle notifications |
/// | `ready_for_event` | Per-event delivery gate |
///
/// # Readiness contract
///
/// Returning `false` from [`ready_for_event`](Self::ready_for_event)
/// parks that event at the head of the queue: no later event is
/// delivered until the head is accepted. This is how an extension takes
/// a synchronous dependency on another extension's shared state without
/// losing ordering: the check reads the dependency inline via
/// [`ExtensionApi::blocking_get_shared_state`](crate::ExtensionApi::blocking_get_shared_state)
/// and returns `false` until the state is SET. The hub re-asks on every
/// new stimulus, so the check should be limited to such reads and must
/// not mutate anything.
pub trait Extension: Send {
    /// Canonical name. Must be non-blank; blank names fail registration
    /// with [`RegistrationError::InvalidExtensionName`].
    fn name(&self) -> &str;

    /// Human-readable name for the hub registry snapshot.
    fn friendly_name(&self) -> Option<&str> {
        None
    }

    /// Extension version string.
    fn version(&self) -> Option<&str> {
        None
    }

    /// Additional metadata published in the hub registry snapshot.
    fn metadata(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Called once after the hub has accepted the registration, before
    /// any event is delivered.
    fn on_registered(&mut self) {}

    /// Called once when the extension is unregistered or the hub shuts
    /// down. No events are delivered afterwards.
    fn on_unregistered(&mut self) {}

    /// Per-event delivery gate; see the trait docs for the contract.
    fn ready_for_event(&mut self, _event: &Event) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl Extension for Minimal {
        fn name(&self) -> &str {
            "com.example.minimal"
        }
    }

    #[test]
    fn defaults_are_neutral() {
        let mut ext = Minimal;
        assert_eq!(ext.name(), "com.example.minimal");
        assert_eq!(ext.friendly_name(), None);
        assert_eq!(ext.version(), None);
        assert!(ext.metadata().is_none());

        let event = Event::new("e", "t", "s");
        assert!(ext.ready_for_event(&event));

        ext.on_registered();
        ext.on_unregistered();
    }
}
