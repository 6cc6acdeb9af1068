//! Wrapper framework tag.
//!
//! Hosts built on a cross-platform framework tag the hub before
//! `start()`; the tag is published in the hub's registry shared state.
//! Setting it after start is logged and ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The host wrapper framework, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapperType {
    /// Native host, no wrapper.
    #[default]
    None,
    /// React Native host.
    ReactNative,
    /// Flutter host.
    Flutter,
    /// Cordova host.
    Cordova,
    /// Unity host.
    Unity,
}

impl WrapperType {
    /// Single-letter tag used in version reporting.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::None => "N",
            Self::ReactNative => "R",
            Self::Flutter => "F",
            Self::Cordova => "C",
            Self::Unity => "U",
        }
    }

    /// Human-readable name published in the hub shared state.
    #[must_use]
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ReactNative => "React Native",
            Self::Flutter => "Flutter",
            Self::Cordova => "Cordova",
            Self::Unity => "Unity",
        }
    }
}

impl fmt::Display for WrapperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.friendly_name())
    }
}
