//! # Error Types
//!
//! Structured error types for tower_core. Each error carries enough context
//! (which field, which table, which value) for a caller to fix the input
//! without reading the source.
//!
//! ## Taxonomy
//!
//! - **Validation**: malformed tower input, rejected at construction
//!   ([`CalcError::InvalidInput`], [`CalcError::MissingField`])
//! - **Lookup**: unknown table key or bar catalog key
//!   ([`CalcError::LookupFailed`], [`CalcError::BarNotFound`])
//! - **Domain precondition**: a coefficient formula received a value outside
//!   its domain ([`CalcError::PreconditionFailed`])
//!
//! All of them are terminal for the computation: the inputs are deterministic,
//! so retrying cannot help.
//!
//! ## Example
//!
//! ```rust
//! use tower_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height: f64) -> CalcResult<()> {
//!     if height <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height",
//!             height.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-3.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tower_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive dimension, base ≤ top, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Key not present in a standard table
    #[error("Lookup failed in {table}: no entry for '{key}'")]
    LookupFailed { table: String, key: String },

    /// Bar key not present in the selected catalog
    #[error("Bar not found: '{key}' is not in the {catalog} catalog")]
    BarNotFound { catalog: String, key: String },

    /// A formula was called with a value outside its domain
    #[error("Precondition failed in {calculation}: '{field}' = {value} - {reason}")]
    PreconditionFailed {
        calculation: String,
        field: String,
        value: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a LookupFailed error
    pub fn lookup_failed(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::LookupFailed {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a BarNotFound error
    pub fn bar_not_found(catalog: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::BarNotFound {
            catalog: catalog.into(),
            key: key.into(),
        }
    }

    /// Create a PreconditionFailed error
    pub fn precondition_failed(
        calculation: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::PreconditionFailed {
            calculation: calculation.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::LookupFailed { .. } => "LOOKUP_FAILED",
            CalcError::BarNotFound { .. } => "BAR_NOT_FOUND",
            CalcError::PreconditionFailed { .. } => "PRECONDITION_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
