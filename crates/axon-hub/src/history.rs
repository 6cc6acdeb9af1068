//! Event-history collaborator.
//!
//! The hub records an event into history only when the event carries a
//! mask; the stored key is the deterministic fingerprint from
//! [`axon_event::history`]. Queries count fingerprint occurrences
//! inside a time window, optionally as an ordered sequence.
//!
//! Persistence is a host concern: the hub depends only on the
//! [`EventHistory`] trait. [`InMemoryEventHistory`] backs tests and
//! hosts that opt out of persistence.

use axon_event::history::{fingerprint, EventHistoryRequest, EventHistoryResultHandler};
use axon_event::Event;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::debug;

/// Completion callback for a record attempt; `true` means stored.
pub type RecordCompletion = Box<dyn FnOnce(bool) + Send + 'static>;

/// History collaborator interface.
///
/// Implementations serialize their own storage; both methods may be
/// called from the hub writers and must not block them for long.
pub trait EventHistory: Send + Sync {
    /// Records `event` keyed by its mask fingerprint.
    ///
    /// Called only for events with a mask; an implementation receiving
    /// a maskless event reports `false`.
    fn record_event(&self, event: &Event, done: RecordCompletion);

    /// Looks up occurrence counts for `requests`.
    ///
    /// With `enforce_order` the requests must match in sequence, each
    /// occurrence at or after the previous one; the handler receives 1
    /// when the whole sequence was found and 0 otherwise. Without it,
    /// the handler receives the total occurrence count across requests.
    fn get_events(
        &self,
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    );
}

#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    hash: u64,
    timestamp: DateTime<Utc>,
}

/// Mutex-guarded in-process history index.
#[derive(Default)]
pub struct InMemoryEventHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl InMemoryEventHistory {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock").len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventHistory for InMemoryEventHistory {
    fn record_event(&self, event: &Event, done: RecordCompletion) {
        let Some(mask) = event.mask() else {
            debug!(event = event.name(), "history record skipped: no mask");
            done(false);
            return;
        };

        let entry = HistoryEntry {
            hash: fingerprint(event.data(), Some(mask)),
            timestamp: event.timestamp(),
        };
        self.entries.lock().expect("lock").push(entry);
        done(true);
    }

    fn get_events(
        &self,
        requests: Vec<EventHistoryRequest>,
        enforce_order: bool,
        handler: EventHistoryResultHandler,
    ) {
        let mut entries = self.entries.lock().expect("lock").clone();
        entries.sort_by_key(|e| e.timestamp);

        let result = if enforce_order {
            sequence_found(&entries, &requests)
        } else {
            total_count(&entries, &requests)
        };
        handler(result);
    }
}

fn in_window(entry: &HistoryEntry, request: &EventHistoryRequest) -> bool {
    request.from.is_none_or(|from| entry.timestamp >= from)
        && request.to.is_none_or(|to| entry.timestamp <= to)
}

fn total_count(entries: &[HistoryEntry], requests: &[EventHistoryRequest]) -> i32 {
    let mut count = 0;
    for request in requests {
        let hash = request.fingerprint();
        count += entries
            .iter()
            .filter(|e| e.hash == hash && in_window(e, request))
            .count();
    }
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn sequence_found(entries: &[HistoryEntry], requests: &[EventHistoryRequest]) -> i32 {
    let mut cursor: Option<DateTime<Utc>> = None;
    for request in requests {
        let hash = request.fingerprint();
        let hit = entries.iter().find(|e| {
            e.hash == hash && in_window(e, request) && cursor.is_none_or(|c| e.timestamp >= c)
        });
        match hit {
            Some(entry) => cursor = Some(entry.timestamp),
            None => return 0,
        }
    }
    1
}
