//! Hub layer errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`HubError::ChannelClosed`] | `HUB_CHANNEL_CLOSED` | No |
//! | [`HubError::PreprocessorFailed`] | `HUB_PREPROCESSOR_FAILED` | No |
//!
//! Lifecycle requests that arrive during shutdown are not reported
//! here: the registration callback surface is fixed
//! ([`RegistrationError`](axon_extension::RegistrationError)), and a
//! hub mid-shutdown answers those with
//! [`RegistrationError::Unknown`](axon_extension::RegistrationError::Unknown).

use axon_types::ErrorCode;
use thiserror::Error;

/// Hub layer error.
///
/// The dispatch path itself is fire-and-forget and never returns these;
/// they surface from preprocessors and from waiting on a hub that is
/// already gone.
///
/// # Example
///
/// ```
/// use axon_hub::HubError;
/// use axon_types::ErrorCode;
///
/// let err = HubError::ChannelClosed;
/// assert_eq!(err.code(), "HUB_CHANNEL_CLOSED");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, Error)]
pub enum HubError {
    /// A hub writer task is gone; the hub was dropped or crashed.
    #[error("event hub channel closed")]
    ChannelClosed,

    /// A preprocessor rejected an event; the event is dropped from
    /// fan-out.
    #[error("preprocessor failed: {0}")]
    PreprocessorFailed(String),
}

impl ErrorCode for HubError {
    fn code(&self) -> &'static str {
        match self {
            Self::ChannelClosed => "HUB_CHANNEL_CLOSED",
            Self::PreprocessorFailed(_) => "HUB_PREPROCESSOR_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_types::assert_error_codes;

    fn all_variants() -> Vec<HubError> {
        vec![
            HubError::ChannelClosed,
            HubError::PreprocessorFailed("x".into()),
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "HUB_");
    }

    #[test]
    fn nothing_is_recoverable() {
        for err in all_variants() {
            assert!(!err.is_recoverable());
        }
    }
}
