//! Event-history request types and the mask fingerprint.
//!
//! The hub records an event into the history index only when the event
//! carries a `mask`. The index key is a deterministic 64-bit fingerprint
//! over the masked portion of the event data: the same mask and data
//! always hash identically, independent of map-entry ordering.
//!
//! # Fingerprint construction
//!
//! ```text
//! data + mask ──select──► leaf (path, value) pairs
//!                              │ sort by path (lexicographic)
//!                              ▼
//!                    "path:value|path:value|..."
//!                              │ SHA-256, first 8 bytes
//!                              ▼
//!                            u64 key
//! ```
//!
//! Mask entries are dot-separated paths into the data map. A path that
//! resolves to nothing is skipped; selecting only absent paths hashes
//! like an empty selection.
//!
//! A query ([`EventHistoryRequest`]) carries the key-value map to look
//! up; its fingerprint selects every leaf of that map. A query matches
//! a recorded event when the query map equals the event's masked
//! selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Handler receiving the result of a history query.
///
/// With `enforce_order` the value is 1 when the ordered sequence was
/// found and 0 when it was not; otherwise it is the total occurrence
/// count. Negative values are reserved for collaborator failures.
pub type EventHistoryResultHandler = Box<dyn FnOnce(i32) + Send + 'static>;

/// A single history query: a key-value map plus an optional time window.
///
/// # Example
///
/// ```
/// use axon_event::EventHistoryRequest;
/// use serde_json::json;
///
/// let request = EventHistoryRequest::new(json!({"cart.items": 3}));
/// assert!(request.from.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHistoryRequest {
    /// Key-value map identifying the fingerprint to look up.
    pub data: Value,
    /// Inclusive lower bound of the search window.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound of the search window.
    pub to: Option<DateTime<Utc>>,
}

impl EventHistoryRequest {
    /// Creates a request over the full history.
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self {
            data,
            from: None,
            to: None,
        }
    }

    /// Restricts the search window.
    #[must_use]
    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Fingerprint this request resolves to.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        fingerprint(Some(&self.data), None)
    }
}

/// Computes the deterministic fingerprint of `data` selected by `mask`.
///
/// With no mask every leaf of the data participates. The result depends
/// only on the selected `(path, value)` set, never on map-entry order.
#[must_use]
pub fn fingerprint(data: Option<&Value>, mask: Option<&[String]>) -> u64 {
    let mut pairs: Vec<(String, String)> = Vec::new();

    if let Some(data) = data {
        match mask {
            Some(paths) => {
                for path in paths {
                    if let Some(value) = select_path(data, path) {
                        collect_leaves(value, path, &mut pairs);
                    }
                }
            }
            None => collect_leaves(data, "", &mut pairs),
        }
    }

    pairs.sort();
    pairs.dedup();

    let mut hasher = Sha256::new();
    for (path, value) in &pairs {
        hasher.update(path.as_bytes());
        hasher.update(b":");
        hasher.update(value.as_bytes());
        hasher.update(b"|");
    }
    let digest = hasher.finalize();

    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Resolves a dot-separated path inside a JSON map.
///
/// A top-level key containing dots wins over path traversal, so masks
/// like `"cart.items"` work both for nested maps and for flat maps with
/// dotted keys.
fn select_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(direct) = data.as_object().and_then(|map| map.get(path)) {
        return Some(direct);
    }

    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Flattens `value` under `prefix` into scalar `(path, rendering)` pairs.
fn collect_leaves(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(child, &path, out);
            }
        }
        // Arrays are treated as leaves: their canonical JSON rendering
        // participates as a single value.
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn same_data_same_hash() {
        let data = json!({"a": {"b": 1}, "c": "x"});
        let mask = vec!["a.b".to_string(), "c".to_string()];

        let h1 = fingerprint(Some(&data), Some(&mask));
        let h2 = fingerprint(Some(&data), Some(&mask));
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_is_independent_of_mask_order() {
        let data = json!({"a": 1, "b": 2});

        let forward = fingerprint(Some(&data), Some(&["a".to_string(), "b".to_string()]));
        let reversed = fingerprint(Some(&data), Some(&["b".to_string(), "a".to_string()]));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn different_values_differ() {
        let one = json!({"a": 1});
        let two = json!({"a": 2});
        let mask = vec!["a".to_string()];

        assert_ne!(
            fingerprint(Some(&one), Some(&mask)),
            fingerprint(Some(&two), Some(&mask))
        );
    }

    #[test]
    fn missing_paths_are_skipped() {
        let data = json!({"a": 1});

        let with_missing = fingerprint(Some(&data), Some(&["a".to_string(), "nope".to_string()]));
        let without = fingerprint(Some(&data), Some(&["a".to_string()]));
        assert_eq!(with_missing, without);
    }

    #[test]
    fn only_missing_paths_hash_like_empty() {
        let data = json!({"a": 1});

        let all_missing = fingerprint(Some(&data), Some(&["nope".to_string()]));
        let empty = fingerprint(None, None);
        assert_eq!(all_missing, empty);
    }

    #[test]
    fn masked_selection_matches_query_map() {
        let recorded = json!({"a": 1, "noise": true});
        let mask = vec!["a".to_string()];
        let query = EventHistoryRequest::new(json!({"a": 1}));

        assert_eq!(fingerprint(Some(&recorded), Some(&mask)), query.fingerprint());
    }

    #[test]
    fn dotted_top_level_keys_resolve() {
        let flat = json!({"cart.items": 3});
        let nested = json!({"cart": {"items": 3}});
        let mask = vec!["cart.items".to_string()];

        assert_eq!(
            fingerprint(Some(&flat), Some(&mask)),
            fingerprint(Some(&nested), Some(&mask))
        );
    }

    #[test]
    fn no_mask_selects_everything() {
        let a = json!({"x": 1, "y": {"z": 2}});
        let b = json!({"y": {"z": 2}, "x": 1});

        assert_eq!(fingerprint(Some(&a), None), fingerprint(Some(&b), None));
    }

    #[test]
    fn request_windows() {
        let request = EventHistoryRequest::new(json!({"a": 1})).between(None, Some(Utc::now()));
        assert!(request.to.is_some());
        assert!(request.from.is_none());
    }
}
