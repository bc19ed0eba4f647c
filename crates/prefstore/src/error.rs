//! Error types for preference store operations

use thiserror::Error;

/// Result type for preference store operations
pub type Result<T> = std::result::Result<T, PrefsError>;

/// Errors reported by a preference store
///
/// Reads and resets are the only fallible operations. Writes cannot fail
/// at this level; a backend that loses a write reports it through its own
/// logging rather than through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefsError {
    /// The key has neither a stored value nor a registered default
    #[error("no value or default set for key '{key}'")]
    NoValue {
        /// Key that was looked up
        key: String,
    },

    /// The key has no registered default to reset to
    #[error("no default set for key '{key}'")]
    NoDefault {
        /// Key that was being reset
        key: String,
    },
}

impl PrefsError {
    /// Check if the error is a missing-value error
    #[must_use]
    pub fn is_no_value(&self) -> bool {
        matches!(self, PrefsError::NoValue { .. })
    }

    /// Check if the error is a missing-default error
    #[must_use]
    pub fn is_no_default(&self) -> bool {
        matches!(self, PrefsError::NoDefault { .. })
    }
}
