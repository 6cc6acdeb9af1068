//! Versioned shared-state storage for one `(extension, kind)` pair.
//!
//! A [`SharedStateManager`] is an append-only, version-ordered map of
//! snapshots. Versions are event numbers; appends must be strictly
//! increasing. Reads are floor lookups: the newest snapshot at or below
//! the queried version.
//!
//! The manager performs no synchronization of its own. The hub writer
//! owns every manager exclusively; serialization of racing writers is
//! the hub's job, not the manager's.

use axon_extension::SharedStateResult;
use axon_types::EventNumber;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// One stored snapshot.
#[derive(Debug, Clone, PartialEq)]
enum Snapshot {
    /// Reserved slot, no data yet.
    Pending,
    /// Immutable payload.
    Set(Value),
}

/// Append-only, version-ordered snapshot store.
///
/// # Example
///
/// ```
/// use axon_hub::SharedStateManager;
/// use axon_types::EventNumber;
/// use serde_json::json;
///
/// let mut mgr = SharedStateManager::new();
/// assert!(mgr.set_state(EventNumber::from(1), json!({"k": "v1"})));
///
/// let result = mgr.resolve(EventNumber::from(5));
/// assert!(result.is_set());
/// ```
#[derive(Debug, Default)]
pub struct SharedStateManager {
    snapshots: BTreeMap<EventNumber, Snapshot>,
}

impl SharedStateManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a SET snapshot at `version`.
    ///
    /// Returns `false` without modifying anything when `version` is not
    /// strictly greater than the last appended version, unless the
    /// existing snapshot at `version` is PENDING (use
    /// [`update_pending_state`](Self::update_pending_state) for that).
    pub fn set_state(&mut self, version: EventNumber, data: Value) -> bool {
        if !self.is_appendable(version) {
            warn!(%version, "shared state rejected: version not after last");
            return false;
        }
        self.snapshots.insert(version, Snapshot::Set(data));
        true
    }

    /// Appends a PENDING snapshot at `version`; same ordering rule as
    /// [`set_state`](Self::set_state).
    pub fn set_pending_state(&mut self, version: EventNumber) -> bool {
        if !self.is_appendable(version) {
            warn!(%version, "pending shared state rejected: version not after last");
            return false;
        }
        self.snapshots.insert(version, Snapshot::Pending);
        true
    }

    /// Converts the PENDING snapshot at `version` to SET.
    ///
    /// Returns `false` when no snapshot exists at `version` or it is
    /// already SET; a settled snapshot is never overwritten.
    pub fn update_pending_state(&mut self, version: EventNumber, data: Value) -> bool {
        match self.snapshots.get_mut(&version) {
            Some(slot @ Snapshot::Pending) => {
                *slot = Snapshot::Set(data);
                true
            }
            Some(Snapshot::Set(_)) => {
                warn!(%version, "pending update ignored: snapshot already set");
                false
            }
            None => {
                warn!(%version, "pending update ignored: no snapshot at version");
                false
            }
        }
    }

    /// Newest snapshot with version at or below `version`, regardless
    /// of status. PENDING resolves with no payload.
    #[must_use]
    pub fn resolve(&self, version: EventNumber) -> SharedStateResult {
        match self.floor(version) {
            Some(Snapshot::Set(data)) => SharedStateResult::set(data.clone()),
            Some(Snapshot::Pending) => SharedStateResult::pending(None),
            None => SharedStateResult::none(),
        }
    }

    /// Newest SET snapshot with version at or below `version`.
    #[must_use]
    pub fn resolve_last_set(&self, version: EventNumber) -> SharedStateResult {
        let found = self
            .snapshots
            .range(..=version)
            .rev()
            .find_map(|(_, snapshot)| match snapshot {
                Snapshot::Set(data) => Some(data.clone()),
                Snapshot::Pending => None,
            });

        match found {
            Some(data) => SharedStateResult::set(data),
            None => SharedStateResult::none(),
        }
    }

    /// Returns `true` when no snapshot has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Removes every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    fn floor(&self, version: EventNumber) -> Option<&Snapshot> {
        self.snapshots
            .range(..=version)
            .next_back()
            .map(|(_, snapshot)| snapshot)
    }

    /// A version is appendable when it is strictly greater than every
    /// stored version. A PENDING snapshot at exactly `version` is not
    /// appendable here; it is the target of an update instead.
    fn is_appendable(&self, version: EventNumber) -> bool {
        match self.snapshots.keys().next_back() {
            Some(last) => version > *last,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_extension::SharedStateStatus;
    use serde_json::json;

    fn n(v: u64) -> EventNumber {
        EventNumber::from(v)
    }

    #[test]
    fn empty_resolves_none() {
        let mgr = SharedStateManager::new();
        assert!(mgr.is_empty());

        let result = mgr.resolve(EventNumber::LATEST);
        assert_eq!(result.status, SharedStateStatus::None);
        assert_eq!(result.value, None);
    }

    #[test]
    fn resolve_is_floor_lookup() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_state(n(2), json!({"v": 2})));
        assert!(mgr.set_state(n(5), json!({"v": 5})));

        assert_eq!(mgr.resolve(n(1)).status, SharedStateStatus::None);
        assert_eq!(mgr.resolve(n(2)).value, Some(json!({"v": 2})));
        assert_eq!(mgr.resolve(n(4)).value, Some(json!({"v": 2})));
        assert_eq!(mgr.resolve(n(5)).value, Some(json!({"v": 5})));
        assert_eq!(mgr.resolve(EventNumber::LATEST).value, Some(json!({"v": 5})));
    }

    #[test]
    fn versions_must_strictly_increase() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_state(n(3), json!(1)));
        assert!(!mgr.set_state(n(3), json!(2)));
        assert!(!mgr.set_state(n(2), json!(3)));
        assert!(mgr.set_state(n(4), json!(4)));

        assert_eq!(mgr.resolve(n(3)).value, Some(json!(1)));
    }

    #[test]
    fn pending_resolves_without_payload() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_pending_state(n(1)));

        let result = mgr.resolve(n(1));
        assert_eq!(result.status, SharedStateStatus::Pending);
        assert_eq!(result.value, None);
    }

    #[test]
    fn pending_converts_exactly_once() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_pending_state(n(1)));
        assert!(mgr.update_pending_state(n(1), json!({"x": 1})));
        assert!(!mgr.update_pending_state(n(1), json!({"x": 2})));

        assert_eq!(mgr.resolve(n(1)).value, Some(json!({"x": 1})));
    }

    #[test]
    fn update_without_pending_is_rejected() {
        let mut mgr = SharedStateManager::new();
        assert!(!mgr.update_pending_state(n(1), json!(1)));

        mgr.set_state(n(1), json!(1));
        assert!(!mgr.update_pending_state(n(1), json!(2)));
    }

    #[test]
    fn last_set_skips_pending() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_state(n(1), json!({"v": 1})));
        assert!(mgr.set_pending_state(n(3)));

        let any = mgr.resolve(n(5));
        assert_eq!(any.status, SharedStateStatus::Pending);

        let last_set = mgr.resolve_last_set(n(5));
        assert_eq!(last_set.status, SharedStateStatus::Set);
        assert_eq!(last_set.value, Some(json!({"v": 1})));
    }

    #[test]
    fn last_set_none_when_only_pending() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_pending_state(n(1)));

        assert_eq!(mgr.resolve_last_set(n(5)).status, SharedStateStatus::None);
    }

    #[test]
    fn bootstrap_zero_version_is_allowed() {
        let mut mgr = SharedStateManager::new();
        assert!(mgr.set_state(EventNumber::ZERO, json!({"boot": true})));
        assert!(mgr.set_state(n(1), json!({"boot": false})));

        assert_eq!(mgr.resolve(EventNumber::ZERO).value, Some(json!({"boot": true})));
    }

    #[test]
    fn clear_empties_the_manager() {
        let mut mgr = SharedStateManager::new();
        mgr.set_state(n(1), json!(1));
        mgr.clear();

        assert!(mgr.is_empty());
        assert_eq!(mgr.resolve(n(1)).status, SharedStateStatus::None);
    }
}
