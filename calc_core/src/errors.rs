//! # Error Types
//!
//! Structured error types for calc_core. Every calculator validates its input
//! before any formula runs, so almost every error a caller sees is an input
//! problem that names the offending field.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_radius(radius: f64) -> CalcResult<()> {
//!     if radius <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "radius".to_string(),
//!             value: radius.to_string(),
//!             reason: "Radius must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// A single rejected input field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' = {}: {}", self.field, self.value, self.reason)
    }
}

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong so a form
/// can highlight the field and re-prompt the user.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-finite, out of range, inconsistent)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Several fields failed validation in the same pass
    #[error("{} invalid fields: {}", .errors.len(), join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Key not present in a static lookup table (materials, isotopes)
    #[error("Not found in {table}: {key}")]
    NotFound { table: String, key: String },

    /// The formula has no defined value for this (otherwise valid) input
    #[error("Undefined result: {calculation} - {reason}")]
    Undefined {
        calculation: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
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

    /// Create a NotFound error for a lookup table miss
    pub fn not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::NotFound {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an Undefined error
    pub fn undefined(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Undefined {
            calculation: calculation.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build the error for a failed validation pass.
    ///
    /// A single failure keeps the flat `InvalidInput` shape.
    pub fn from_field_errors(mut errors: Vec<FieldError>) -> Self {
        if errors.len() == 1 {
            let e = errors.remove(0);
            CalcError::InvalidInput {
                field: e.field,
                value: e.value,
                reason: e.reason,
            }
        } else {
            CalcError::Validation { errors }
        }
    }

    /// All field-level problems carried by this error
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            CalcError::InvalidInput { field, value, reason } => {
                vec![FieldError::new(field.clone(), value.clone(), reason.clone())]
            }
            CalcError::Validation { errors } => errors.clone(),
            _ => Vec::new(),
        }
    }

    /// True for errors caused by the caller's input rather than I/O
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::Validation { .. }
                | CalcError::NotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::Validation { .. } => "VALIDATION_FAILED",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::Undefined { .. } => "UNDEFINED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("radius", "-5", "Radius must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::file_error("read", "trips.json", "denied").error_code(), "FILE_ERROR");
        assert_eq!(CalcError::not_found("isotopes", "X-1").error_code(), "NOT_FOUND");
        assert_eq!(CalcError::undefined("bond yield", "no root").error_code(), "UNDEFINED");
    }

    #[test]
    fn test_single_field_error_stays_flat() {
        let err = CalcError::from_field_errors(vec![FieldError::new("side", "0", "must be positive")]);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn test_multiple_field_errors() {
        let err = CalcError::from_field_errors(vec![
            FieldError::new("length", "-1", "must be positive"),
            FieldError::new("width", "NaN", "must be a finite number"),
        ]);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(err.is_input_error());
        let msg = err.to_string();
        assert!(msg.contains("length"));
        assert!(msg.contains("width"));
    }
}
