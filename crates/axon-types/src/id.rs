//! Identifier types for the event hub.
//!
//! Two identities exist for every event that passes through the hub:
//!
//! - [`EventId`]: the stable unique identifier minted at construction.
//!   Response events carry the trigger's `EventId` as their `response_id`.
//! - [`EventNumber`]: the monotonic sequence number the hub assigns at
//!   dispatch. Shared-state versions are event numbers; all ordering
//!   guarantees are expressed in terms of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable unique identifier of an [`Event`](https://docs.rs/axon-event).
///
/// Minted once when the event is constructed and never reassigned, even
/// when a rule transform clones the event with new data.
///
/// # Example
///
/// ```
/// use axon_types::EventId;
///
/// let a = EventId::new();
/// let b = EventId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random identifier.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic sequence number assigned by the hub at dispatch.
///
/// Numbers start at 1; [`EventNumber::ZERO`] is reserved for bootstrap
/// shared states published before any event, and [`EventNumber::LATEST`]
/// is the sentinel meaning "newest available" for shared-state reads
/// without a reference event.
///
/// # Example
///
/// ```
/// use axon_types::EventNumber;
///
/// let n = EventNumber::from(3);
/// assert!(EventNumber::ZERO < n);
/// assert!(n < EventNumber::LATEST);
/// assert_eq!(n.next(), EventNumber::from(4));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct EventNumber(u64);

impl EventNumber {
    /// Bootstrap version, ordered before every assigned number.
    pub const ZERO: Self = Self(0);

    /// Sentinel for "newest available"; never assigned to an event.
    pub const LATEST: Self = Self(u64::MAX);

    /// Returns the raw value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the following number.
    ///
    /// Saturates at [`EventNumber::LATEST`] so the sentinel is never
    /// produced by arithmetic overflow.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the preceding number, saturating at zero.
    #[must_use]
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl From<u64> for EventNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_unique() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn event_id_roundtrips_serde() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        let back: EventId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, back);
    }

    #[test]
    fn event_number_ordering() {
        let one = EventNumber::from(1);
        let two = EventNumber::from(2);

        assert!(EventNumber::ZERO < one);
        assert!(one < two);
        assert!(two < EventNumber::LATEST);
    }

    #[test]
    fn next_and_prev() {
        let n = EventNumber::from(7);
        assert_eq!(n.next(), EventNumber::from(8));
        assert_eq!(n.prev(), EventNumber::from(6));
        assert_eq!(EventNumber::ZERO.prev(), EventNumber::ZERO);
    }

    #[test]
    fn next_never_produces_latest_by_overflow() {
        assert_eq!(EventNumber::LATEST.next(), EventNumber::LATEST);
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(EventNumber::default(), EventNumber::ZERO);
    }

    #[test]
    fn display_formats() {
        assert_eq!(EventNumber::from(12).to_string(), "#12");
    }
}
