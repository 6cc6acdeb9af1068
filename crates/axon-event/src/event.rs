//! The immutable event value.
//!
//! An [`Event`] is created by a producer or an extension, handed to the
//! hub, and never mutated afterwards. The hub assigns its
//! [`EventNumber`](axon_types::EventNumber) separately at dispatch; the
//! number is not part of the value so that cloning for fan-out stays
//! cheap and identity stays stable.

use axon_types::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable event record.
///
/// # Fields
///
/// | Field | Meaning |
/// |-------|---------|
/// | `id` | Stable unique identifier, minted at construction |
/// | `name` | Human-readable label for logs and debugging |
/// | `event_type` / `source` | Opaque routing tags, matched case-insensitively |
/// | `data` | Optional JSON payload (nested map) |
/// | `mask` | Optional data-path selectors for event history |
/// | `response_id` | Identifier of the trigger this event responds to |
/// | `parent_id` | Identifier of the event this one was chained from |
/// | `timestamp` | UTC creation time |
///
/// # Example
///
/// ```
/// use axon_event::Event;
/// use serde_json::json;
///
/// let e = Event::new("Checkout", "com.axon.eventType.generic", "com.axon.eventSource.requestContent")
///     .with_data(json!({ "cart": { "items": 3 } }))
///     .with_mask(vec!["cart.items".into()]);
///
/// assert_eq!(e.name(), "Checkout");
/// assert!(e.mask().is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    name: String,
    event_type: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mask: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<EventId>,
    timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with a fresh identity and the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            event_type: event_type.into(),
            source: source.into(),
            data: None,
            mask: None,
            response_id: None,
            parent_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a response event correlated to `trigger`.
    ///
    /// The response carries the trigger's type and source, its
    /// `response_id` points at the trigger, and `parent_id` records the
    /// chain for debugging.
    #[must_use]
    pub fn new_response_to(name: impl Into<String>, trigger: &Event) -> Self {
        let mut event = Self::new(name, trigger.event_type.clone(), trigger.source.clone());
        event.response_id = Some(trigger.id);
        event.parent_id = Some(trigger.id);
        event
    }

    /// Attaches a data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches an event-history mask (ordered data-path selectors).
    #[must_use]
    pub fn with_mask(mut self, mask: Vec<String>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Records the event this one was chained from.
    #[must_use]
    pub fn with_parent(mut self, parent: &Event) -> Self {
        self.parent_id = Some(parent.id);
        self
    }

    /// Clones this event with a replacement payload.
    ///
    /// Identity, routing tags, mask, correlation and timestamp are all
    /// preserved. This is the shape rule-driven transforms use: the
    /// transformed event is still *the same event* for ordering and
    /// response correlation.
    #[must_use]
    pub fn cloned_with_data(&self, data: Value) -> Self {
        let mut clone = self.clone();
        clone.data = Some(data);
        clone
    }

    /// Stable unique identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Human-readable label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Routing type tag.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Routing source tag.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Data payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Event-history mask, if any.
    #[must_use]
    pub fn mask(&self) -> Option<&[String]> {
        self.mask.as_deref()
    }

    /// Identifier of the trigger event this one responds to.
    #[must_use]
    pub fn response_id(&self) -> Option<EventId> {
        self.response_id
    }

    /// Identifier of the event this one was chained from.
    #[must_use]
    pub fn parent_id(&self) -> Option<EventId> {
        self.parent_id
    }

    /// UTC creation time.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` when this event is a response to some trigger.
    #[must_use]
    pub fn is_response(&self) -> bool {
        self.response_id.is_some()
    }

    /// Returns `true` when `(event_type, source)` match this event under
    /// the listener rule: case-insensitive equality, with `"*"` matching
    /// anything.
    #[must_use]
    pub fn matches(&self, event_type: &str, source: &str) -> bool {
        tag_matches(event_type, &self.event_type) && tag_matches(source, &self.source)
    }
}

fn tag_matches(pattern: &str, value: &str) -> bool {
    pattern == crate::names::WILDCARD || pattern.eq_ignore_ascii_case(value)
}
