//! Well-known event type and source names.
//!
//! Type and source strings are opaque to the hub except for listener
//! matching, which is case-insensitive with `"*"` as the wildcard. The
//! constants here are the names the hub itself emits and the ones
//! extensions most commonly listen on.

/// Matches any event type or source in a listener registration.
pub const WILDCARD: &str = "*";

/// Event types emitted or consumed by the hub core.
pub mod event_type {
    /// Internal hub events (shared-state change notifications, hub state).
    pub const HUB: &str = "com.axon.eventType.hub";

    /// General-purpose application events.
    pub const GENERIC: &str = "com.axon.eventType.generic";
}

/// Event sources emitted or consumed by the hub core.
pub mod event_source {
    /// A standard shared state was created or resolved.
    pub const SHARED_STATE: &str = "com.axon.eventSource.sharedState";

    /// An XDM shared state was created or resolved.
    pub const XDM_SHARED_STATE: &str = "com.axon.eventSource.xdmSharedState";

    /// Producer-facing request content.
    pub const REQUEST_CONTENT: &str = "com.axon.eventSource.requestContent";

    /// Response content correlated to a request event.
    pub const RESPONSE_CONTENT: &str = "com.axon.eventSource.responseContent";
}

/// Data keys used by hub-emitted events.
pub mod data_key {
    /// Shared-state change events carry the owner's name under this key.
    pub const STATE_OWNER: &str = "stateowner";
}

/// Canonical shared-state name of the hub itself.
///
/// The hub publishes its registry snapshot (version, wrapper, registered
/// extensions) under this name whenever an extension is registered or
/// unregistered after start.
pub const EVENT_HUB_NAME: &str = "com.axon.module.eventhub";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_names_are_distinct() {
        assert_ne!(event_source::SHARED_STATE, event_source::XDM_SHARED_STATE);
        assert_ne!(event_type::HUB, event_type::GENERIC);
    }

    #[test]
    fn wildcard_is_a_single_star() {
        assert_eq!(WILDCARD, "*");
    }
}
