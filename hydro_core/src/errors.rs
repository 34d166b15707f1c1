//! # Error Types
//!
//! Structured error types for hydro_core. Every failure of the numerical core
//! is surfaced as one of these variants; nothing is logged and swallowed, and
//! nothing is silently replaced by zero.
//!
//! - [`HydroError::Geometry`] - malformed hull input, raised before any numerical work
//! - [`HydroError::UndefinedQuantity`] - a derived value whose denominator is zero
//! - [`HydroError::Stability`] - a GZ request that cannot be answered
//! - [`HydroError::Cancelled`] - a cooperative abort, always safe to retry
//! - [`HydroError::FileError`], [`HydroError::Serialization`],
//!   [`HydroError::VersionMismatch`] - case file I/O only
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::errors::{HydroError, HydroResult};
//!
//! fn validate_draft(draft_m: f64) -> HydroResult<()> {
//!     if draft_m < 0.0 {
//!         return Err(HydroError::invalid_input(
//!             "draft_m",
//!             draft_m.to_string(),
//!             "Draft cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_draft(-1.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hydro_core operations
pub type HydroResult<T> = Result<T, HydroError>;

/// What is wrong with a hull geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeometryIssue {
    /// No stations or no waterlines at all
    Empty,
    /// Station X or waterline Z decreases with index
    NotMonotonic,
    /// Station X or waterline Z below zero
    NegativePosition,
    /// Half-breadth below zero
    NegativeOffset,
    /// A (station, waterline) pair has no offset
    MissingOffset,
    /// Offset grid shape does not match stations × waterlines
    DimensionMismatch,
    /// NaN or infinite coordinate
    NonFinite,
}

impl std::fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            GeometryIssue::Empty => "empty",
            GeometryIssue::NotMonotonic => "not monotonic",
            GeometryIssue::NegativePosition => "negative position",
            GeometryIssue::NegativeOffset => "negative offset",
            GeometryIssue::MissingOffset => "missing offset",
            GeometryIssue::DimensionMismatch => "dimension mismatch",
            GeometryIssue::NonFinite => "non-finite value",
        };
        f.write_str(text)
    }
}

/// Structured error type for hydrostatic and stability operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum HydroError {
    /// Hull geometry violates an ordering, sign or completeness invariant
    #[error("Geometry error ({issue}) at {location}: {reason}")]
    Geometry {
        issue: GeometryIssue,
        location: String,
        reason: String,
    },

    /// A derived quantity has a zero denominator at the requested draft
    #[error("Undefined quantity '{quantity}': {reason}")]
    UndefinedQuantity { quantity: String, reason: String },

    /// Righting-arm curve cannot be produced or evaluated
    #[error("Stability error: {reason}")]
    Stability { reason: String },

    /// Cooperative cancellation was requested mid-sweep
    #[error("Cancelled during {stage} after {completed} iterations")]
    Cancelled { stage: String, completed: usize },

    /// A per-call configuration value is invalid (draft, heel, density...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Reading or writing a case file failed
    #[error("File error during {operation} on '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// A case file is not valid JSON or does not match the schema
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// A case file was written by an incompatible schema version
    #[error("Case file version {file_version} is incompatible with {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl HydroError {
    /// Create a Geometry error
    pub fn geometry(
        issue: GeometryIssue,
        location: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::Geometry {
            issue,
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create an UndefinedQuantity error
    pub fn undefined(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        HydroError::UndefinedQuantity {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create a Stability error
    pub fn stability(reason: impl Into<String>) -> Self {
        HydroError::Stability {
            reason: reason.into(),
        }
    }

    /// Create a Cancelled signal
    pub fn cancelled(stage: impl Into<String>, completed: usize) -> Self {
        HydroError::Cancelled {
            stage: stage.into(),
            completed,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (retrying can succeed)
    ///
    /// Numerical errors are deterministic: the same input
    /// produces the same error again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HydroError::Cancelled { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HydroError::Geometry { .. } => "GEOMETRY_ERROR",
            HydroError::UndefinedQuantity { .. } => "UNDEFINED_QUANTITY",
            HydroError::Stability { .. } => "STABILITY_ERROR",
            HydroError::Cancelled { .. } => "CANCELLED",
            HydroError::InvalidInput { .. } => "INVALID_INPUT",
            HydroError::FileError { .. } => "FILE_ERROR",
            HydroError::Serialization { .. } => "SERIALIZATION_ERROR",
            HydroError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = HydroError::geometry(GeometryIssue::NotMonotonic, "station 3", "X decreases");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Geometry\""));
        let roundtrip: HydroError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HydroError::undefined("BMt", "zero volume").error_code(), "UNDEFINED_QUANTITY");
        assert_eq!(HydroError::stability("empty range").error_code(), "STABILITY_ERROR");
        assert_eq!(HydroError::cancelled("gz sweep", 4).error_code(), "CANCELLED");
    }

    #[test]
    fn test_only_cancellation_is_recoverable() {
        assert!(HydroError::cancelled("gz sweep", 0).is_recoverable());
        assert!(!HydroError::stability("GMt undefined").is_recoverable());
        assert!(!HydroError::geometry(GeometryIssue::Empty, "stations", "none").is_recoverable());
    }

    #[test]
    fn test_display_includes_context() {
        let error = HydroError::geometry(
            GeometryIssue::MissingOffset,
            "station 2, waterline 5",
            "no record",
        );
        let text = error.to_string();
        assert!(text.contains("missing offset"));
        assert!(text.contains("station 2, waterline 5"));
    }
}
