//! Core types for the Axon SDK.
//!
//! This crate provides the foundational identifier types and the error
//! conventions shared by every crate in the Axon event hub workspace.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                      │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axon-types     : EventId, EventNumber, ErrorCode  ◄── HERE │
//! │  axon-event     : Event, type/source names, history         │
//! │  axon-extension : Extension trait, ExtensionApi façade      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Runtime Layer                           │
//! │  (Internal implementation, NOT for extensions)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axon-hub       : EventHub, containers, shared state        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! - [`EventId`] is UUID-backed: globally unique without coordination,
//!   serializable, and safe to hand to host platforms as a string.
//! - [`EventNumber`] is the hub-assigned monotonic sequence number. It is
//!   the authority for ordering every shared-state read and write; the
//!   UUID never participates in ordering.
//!
//! # Error Conventions
//!
//! All error enums in the workspace implement [`ErrorCode`]:
//!
//! - `code()` returns a stable UPPER_SNAKE_CASE code with a layer prefix
//!   (`EXTENSION_`, `HUB_`, `RESPONSE_`).
//! - `is_recoverable()` tells callers whether retrying can help.
//!
//! The [`assert_error_code`]/[`assert_error_codes`] helpers enforce the
//! convention in each crate's tests.

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{EventId, EventNumber};
