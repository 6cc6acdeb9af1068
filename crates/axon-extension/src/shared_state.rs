//! Shared-state value types.
//!
//! A shared state is a versioned snapshot an extension publishes under
//! its canonical name. Versions are event numbers; readers resolve
//! against a specific event so that a read is reproducible regardless of
//! when it executes.
//!
//! # Snapshot lifecycle
//!
//! ```text
//! create_shared_state ──────────────► SET (immutable payload)
//! create_pending_shared_state ─────► PENDING ──resolve()──► SET
//! ```
//!
//! A PENDING snapshot converts to SET exactly once; further resolver
//! calls are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Which shared-state family a snapshot belongs to.
///
/// Every extension owns two independent, version-ordered families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharedStateType {
    /// Regular shared state.
    Standard,
    /// XDM-formatted shared state.
    Xdm,
}

impl fmt::Display for SharedStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Xdm => write!(f, "xdm"),
        }
    }
}

/// Status of a resolved shared-state read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharedStateStatus {
    /// A snapshot with data exists at or below the queried version.
    Set,
    /// The resolved snapshot is reserved but not yet populated, or a
    /// barrier read downgraded a SET result.
    Pending,
    /// No snapshot exists at or below the queried version.
    None,
}

/// How a read resolves among snapshot statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharedStateResolution {
    /// Newest snapshot at or below the version, PENDING included.
    Any,
    /// Newest SET snapshot at or below the version.
    LastSet,
}

/// Result of a shared-state read.
///
/// A `Pending` result may still carry a value: a barrier read that finds
/// a SET snapshot published ahead of the owner's progress reports the
/// data but downgrades the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedStateResult {
    /// Resolution status.
    pub status: SharedStateStatus,
    /// Snapshot payload, when one exists.
    pub value: Option<Value>,
}

impl SharedStateResult {
    /// A SET result carrying `value`.
    #[must_use]
    pub fn set(value: Value) -> Self {
        Self {
            status: SharedStateStatus::Set,
            value: Some(value),
        }
    }

    /// A PENDING result, optionally carrying the last known payload.
    #[must_use]
    pub fn pending(value: Option<Value>) -> Self {
        Self {
            status: SharedStateStatus::Pending,
            value,
        }
    }

    /// The no-snapshot result.
    #[must_use]
    pub fn none() -> Self {
        Self {
            status: SharedStateStatus::None,
            value: None,
        }
    }

    /// Returns `true` when the status is [`SharedStateStatus::Set`].
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.status == SharedStateStatus::Set
    }
}

/// One-shot resolver returned by
/// [`ExtensionApi::create_pending_shared_state`](crate::ExtensionApi::create_pending_shared_state).
///
/// The first [`resolve`](Self::resolve) converts the reserved PENDING
/// snapshot to SET with the given payload; every later call is ignored.
#[derive(Clone)]
pub struct PendingResolution {
    apply: Arc<dyn Fn(Value) + Send + Sync>,
    resolved: Arc<AtomicBool>,
}

impl PendingResolution {
    /// Wraps the runtime's apply function into a one-shot resolver.
    #[must_use]
    pub fn new(apply: Arc<dyn Fn(Value) + Send + Sync>) -> Self {
        Self {
            apply,
            resolved: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Converts the pending snapshot to SET with `data`.
    ///
    /// Only the first call has an effect, even across clones of the
    /// resolver.
    pub fn resolve(&self, data: Value) {
        if self.resolved.swap(true, Ordering::SeqCst) {
            debug!("pending shared state already resolved, ignoring");
            return;
        }
        (self.apply)(data);
    }

    /// Returns `true` once [`resolve`](Self::resolve) has been called.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for PendingResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResolution")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn result_constructors() {
        assert!(SharedStateResult::set(json!({})).is_set());
        assert!(!SharedStateResult::pending(None).is_set());
        assert_eq!(SharedStateResult::none().status, SharedStateStatus::None);
        assert_eq!(SharedStateResult::none().value, None);
    }

    #[test]
    fn pending_result_may_carry_value() {
        let r = SharedStateResult::pending(Some(json!({"k": "v0"})));
        assert_eq!(r.status, SharedStateStatus::Pending);
        assert_eq!(r.value, Some(json!({"k": "v0"})));
    }

    #[test]
    fn resolver_fires_once() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let resolver = PendingResolution::new(Arc::new(move |v| {
            sink.lock().expect("lock").push(v);
        }));

        assert!(!resolver.is_resolved());
        resolver.resolve(json!({"x": 1}));
        resolver.resolve(json!({"x": 2}));

        assert!(resolver.is_resolved());
        let seen = seen.lock().expect("lock");
        assert_eq!(seen.as_slice(), &[json!({"x": 1})]);
    }

    #[test]
    fn resolver_is_once_across_clones() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let resolver = PendingResolution::new(Arc::new(move |v| {
            sink.lock().expect("lock").push(v);
        }));

        let clone = resolver.clone();
        clone.resolve(json!(1));
        resolver.resolve(json!(2));

        assert_eq!(seen.lock().expect("lock").len(), 1);
    }

    #[test]
    fn type_display() {
        assert_eq!(SharedStateType::Standard.to_string(), "standard");
        assert_eq!(SharedStateType::Xdm.to_string(), "xdm");
    }
}
