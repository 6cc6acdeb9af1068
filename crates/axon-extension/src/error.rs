//! Extension layer errors.
//!
//! Two error types live here:
//!
//! - [`RegistrationError`]: the outcome surface of extension
//!   registration and deregistration, delivered through the
//!   registration callback.
//! - [`ExtensionError`]: failures an extension itself reports, today
//!   only construction failure from a factory.
//!
//! # Error Code Convention
//!
//! All extension errors use the `EXTENSION_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`RegistrationError::InvalidExtensionName`] | `EXTENSION_INVALID_NAME` | No |
//! | [`RegistrationError::DuplicateExtensionName`] | `EXTENSION_DUPLICATE_NAME` | No |
//! | [`RegistrationError::ExtensionInitializationFailure`] | `EXTENSION_INITIALIZATION_FAILURE` | Yes |
//! | [`RegistrationError::ExtensionNotRegistered`] | `EXTENSION_NOT_REGISTERED` | No |
//! | [`RegistrationError::Unknown`] | `EXTENSION_UNKNOWN` | No |
//! | [`ExtensionError::InitFailed`] | `EXTENSION_INIT_FAILED` | Yes |

use axon_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a registration or deregistration request.
///
/// A successful registration invokes the callback with `Ok(())`.
///
/// # Example
///
/// ```
/// use axon_extension::RegistrationError;
/// use axon_types::ErrorCode;
///
/// let err = RegistrationError::DuplicateExtensionName("com.example.profile".into());
/// assert_eq!(err.code(), "EXTENSION_DUPLICATE_NAME");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RegistrationError {
    /// The extension reported a blank canonical name.
    #[error("extension name is missing or blank")]
    InvalidExtensionName,

    /// An extension with the same canonical name is already registered.
    #[error("extension already registered: {0}")]
    DuplicateExtensionName(String),

    /// The extension factory failed.
    ///
    /// **Recoverable** - construction may succeed once the underlying
    /// condition (configuration, platform services) is fixed.
    #[error("extension initialization failed: {0}")]
    ExtensionInitializationFailure(String),

    /// Deregistration was requested for a name the hub does not know.
    #[error("extension not registered")]
    ExtensionNotRegistered,

    /// The hub could not complete the request (for example, it is
    /// shutting down).
    #[error("unknown registration failure")]
    Unknown,
}

impl ErrorCode for RegistrationError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidExtensionName => "EXTENSION_INVALID_NAME",
            Self::DuplicateExtensionName(_) => "EXTENSION_DUPLICATE_NAME",
            Self::ExtensionInitializationFailure(_) => "EXTENSION_INITIALIZATION_FAILURE",
            Self::ExtensionNotRegistered => "EXTENSION_NOT_REGISTERED",
            Self::Unknown => "EXTENSION_UNKNOWN",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExtensionInitializationFailure(_))
    }
}

/// Failure reported by an extension itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ExtensionError {
    /// Construction failed inside an extension factory.
    #[error("initialization failed: {0}")]
    InitFailed(String),
}

impl ErrorCode for ExtensionError {
    fn code(&self) -> &'static str {
        match self {
            Self::InitFailed(_) => "EXTENSION_INIT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::InitFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_types::assert_error_codes;

    fn all_registration_variants() -> Vec<RegistrationError> {
        vec![
            RegistrationError::InvalidExtensionName,
            RegistrationError::DuplicateExtensionName("x".into()),
            RegistrationError::ExtensionInitializationFailure("x".into()),
            RegistrationError::ExtensionNotRegistered,
            RegistrationError::Unknown,
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_registration_variants(), "EXTENSION_");
        assert_error_codes(&[ExtensionError::InitFailed("x".into())], "EXTENSION_");
    }

    #[test]
    fn recoverability() {
        assert!(RegistrationError::ExtensionInitializationFailure("x".into()).is_recoverable());
        assert!(!RegistrationError::InvalidExtensionName.is_recoverable());
        assert!(!RegistrationError::DuplicateExtensionName("x".into()).is_recoverable());
        assert!(!RegistrationError::ExtensionNotRegistered.is_recoverable());
    }

    #[test]
    fn display_messages() {
        let err = RegistrationError::DuplicateExtensionName("com.example.a".into());
        assert!(err.to_string().contains("com.example.a"));
    }
}
