//! Unified error interface for the Axon workspace.
//!
//! Every public error enum in the workspace implements [`ErrorCode`] so
//! hosts and extensions can handle failures by stable code instead of by
//! matching on display strings.
//!
//! # Code Format
//!
//! - **UPPER_SNAKE_CASE**: e.g. `"RESPONSE_CALLBACK_TIMEOUT"`
//! - **Layer-prefixed**: `EXTENSION_`, `HUB_`, `RESPONSE_`
//! - **Stable**: codes are an API contract and never change once shipped
//!
//! # Example
//!
//! ```
//! use axon_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LoadError {
//!     Missing(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for LoadError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "LOAD_MISSING",
//!             Self::Busy => "LOAD_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! assert_eq!(LoadError::Busy.code(), "LOAD_BUSY");
//! assert!(LoadError::Busy.is_recoverable());
//! ```

/// Machine-readable error code interface.
///
/// # Recoverability
///
/// An error is recoverable when retrying the operation may succeed (a
/// timeout, a transient channel failure). Invalid input and misuse are
/// not recoverable: retrying the identical call cannot change the
/// outcome.
pub trait ErrorCode {
    /// Returns the stable machine-readable code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error's code follows the workspace conventions.
///
/// # Checks
///
/// 1. The code is non-empty
/// 2. The code starts with `expected_prefix`
/// 3. The code is UPPER_SNAKE_CASE
///
/// # Panics
///
/// Panics with a descriptive message when any check fails; intended for
/// use inside tests.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Validates every variant of an error enum at once.
///
/// # Example
///
/// ```
/// use axon_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum E { A, B }
///
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "E_A",
///             Self::B => "E_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[E::A, E::B], "E_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Sample {
        Ok,
        Transient,
    }

    impl ErrorCode for Sample {
        fn code(&self) -> &'static str {
            match self {
                Self::Ok => "SAMPLE_OK",
                Self::Transient => "SAMPLE_TRANSIENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn valid_codes_pass() {
        assert_error_codes(&[Sample::Ok, Sample::Transient], "SAMPLE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn wrong_prefix_panics() {
        assert_error_code(&Sample::Ok, "OTHER_");
    }

    #[test]
    fn snake_case_check() {
        assert!(is_upper_snake_case("HUB_SHUTDOWN"));
        assert!(is_upper_snake_case("A1_B2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("_LEADING"));
        assert!(!is_upper_snake_case("TRAILING_"));
        assert!(!is_upper_snake_case("lower_case"));
        assert!(!is_upper_snake_case("MIXED-DASH"));
    }
}
