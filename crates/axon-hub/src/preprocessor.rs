//! Event preprocessors.
//!
//! Preprocessors run on the dispatcher writer, in insertion order, on
//! every event before fan-out. Each is a pure transformation
//! `Event -> Event`; a failing preprocessor drops the event from
//! downstream delivery (its number stays consumed) and is logged.

use crate::hub::HubError;
use axon_event::Event;

/// A pure per-event transformation applied before fan-out.
///
/// Implementations run on the dispatcher writer; they must not block.
///
/// # Example
///
/// ```
/// use axon_event::Event;
/// use axon_hub::{EventPreprocessor, HubError};
/// use serde_json::json;
///
/// struct Stamp;
///
/// impl EventPreprocessor for Stamp {
///     fn process(&mut self, event: Event) -> Result<Event, HubError> {
///         let mut data = event.data().cloned().unwrap_or_else(|| json!({}));
///         data["stamped"] = json!(true);
///         Ok(event.cloned_with_data(data))
///     }
/// }
/// ```
pub trait EventPreprocessor: Send {
    /// Transforms `event`, or fails to discard it from fan-out.
    fn process(&mut self, event: Event) -> Result<Event, HubError>;
}

impl<F> EventPreprocessor for F
where
    F: FnMut(Event) -> Result<Event, HubError> + Send,
{
    fn process(&mut self, event: Event) -> Result<Event, HubError> {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_are_preprocessors() {
        let mut double = |event: Event| -> Result<Event, HubError> {
            let count = event
                .data()
                .and_then(|d| d.get("count"))
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0);
            Ok(event.cloned_with_data(json!({ "count": count * 2 })))
        };

        let event = Event::new("e", "t", "s").with_data(json!({"count": 3}));
        let out = double.process(event).expect("transform");
        assert_eq!(out.data(), Some(&json!({"count": 6})));
    }
}
