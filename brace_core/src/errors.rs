//! # Error Types
//!
//! Structured error types for brace_core. Every failure of the derivation
//! pipeline is fatal to the current computation: the pipeline is a
//! deterministic symbolic computation, so retrying with the same input
//! always reproduces the same error.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::errors::{BraceError, BraceResult};
//!
//! fn require_distinct(coincident: bool) -> BraceResult<()> {
//!     if coincident {
//!         return Err(BraceError::degenerate_geometry(
//!             "parametrized solve",
//!             "contacts 1 and 2 coincide",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_distinct(true).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for brace_core operations
pub type BraceResult<T> = Result<T, BraceError>;

/// Structured error type for derivation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BraceError {
    /// An input value is invalid (ragged matrix, empty mode list, blend factor out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The coefficient matrix of the current formulation is singular beyond
    /// the expected one-dimensional indeterminacy
    #[error("Degenerate geometry in {stage}: {reason}")]
    DegenerateGeometry { stage: String, reason: String },

    /// The stationary-point equation has no admissible solution
    #[error("No stationary point for {contact}: {reason}")]
    NoStationaryPoint { contact: String, reason: String },

    /// Two independent derivations disagree. This is an implementation bug.
    #[error("Inconsistent formulations in {check} for {component}: expected {expected}, got {actual}")]
    InconsistentFormulations {
        check: String,
        component: String,
        expected: String,
        actual: String,
    },

    /// The equation is outside what the univariate solver handles exactly
    #[error("Unsupported equation in '{variable}': degree {degree} without exact roots")]
    UnsupportedEquation { variable: String, degree: u32 },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BraceError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BraceError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DegenerateGeometry error
    pub fn degenerate_geometry(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        BraceError::DegenerateGeometry {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a NoStationaryPoint error
    pub fn no_stationary_point(contact: impl Into<String>, reason: impl Into<String>) -> Self {
        BraceError::NoStationaryPoint {
            contact: contact.into(),
            reason: reason.into(),
        }
    }

    /// Create an InconsistentFormulations error
    pub fn inconsistent(
        check: impl Into<String>,
        component: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        BraceError::InconsistentFormulations {
            check: check.into(),
            component: component.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an UnsupportedEquation error
    pub fn unsupported_equation(variable: impl Into<String>, degree: u32) -> Self {
        BraceError::UnsupportedEquation {
            variable: variable.into(),
            degree,
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        BraceError::Internal {
            message: message.into(),
        }
    }

    /// True for failures that indicate a bug in the derivation rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BraceError::InconsistentFormulations { .. } | BraceError::Internal { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BraceError::InvalidInput { .. } => "INVALID_INPUT",
            BraceError::DegenerateGeometry { .. } => "DEGENERATE_GEOMETRY",
            BraceError::NoStationaryPoint { .. } => "NO_STATIONARY_POINT",
            BraceError::InconsistentFormulations { .. } => "INCONSISTENT_FORMULATIONS",
            BraceError::UnsupportedEquation { .. } => "UNSUPPORTED_EQUATION",
            BraceError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BraceError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for BraceError {
    fn from(err: serde_json::Error) -> Self {
        BraceError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BraceError::degenerate_geometry("null-space solve", "rank 2 < 3");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"DegenerateGeometry\""));
        let roundtrip: BraceError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BraceError::no_stationary_point("contact 1", "constant").error_code(),
            "NO_STATIONARY_POINT"
        );
        assert_eq!(
            BraceError::unsupported_equation("t", 3).error_code(),
            "UNSUPPORTED_EQUATION"
        );
    }

    #[test]
    fn test_internal_classification() {
        assert!(BraceError::inconsistent("cross-check", "F_1x", "0", "1").is_internal());
        assert!(!BraceError::degenerate_geometry("optimizer", "zero scale").is_internal());
    }

    #[test]
    fn test_display_message() {
        let error = BraceError::degenerate_geometry("optimizer", "contacts coincide");
        assert_eq!(error.to_string(), "Degenerate geometry in optimizer: contacts coincide");
    }
}
