//! Error types for tilebench operations.
//!
//! This module defines custom error types that provide better error handling
//! than panicking, allowing the binary to fail fast with a diagnostic while
//! keeping the library callable from tests.

use std::fmt;

/// Errors that can occur while preparing or running a benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilebenchError {
    /// Memory reservation for a benchmark buffer failed.
    AllocationError {
        /// Number of `f64` elements that were requested.
        requested_elements: usize,
        /// Human-readable error message.
        message: String,
    },
    /// The inner dimension of the left operand does not match the outer
    /// dimension of the right operand.
    DimensionMismatch {
        /// Shape of the left operand as (rows, cols).
        left: (usize, usize),
        /// Shape of the right operand as (rows, cols).
        right: (usize, usize),
    },
    /// Configuration validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
    /// The report artifact could not be opened or written.
    ReportError {
        /// Path of the report sink.
        path: String,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for TilebenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilebenchError::AllocationError {
                requested_elements,
                message,
            } => write!(
                f,
                "Memory allocation failed: {} (requested {} f64 elements)",
                message, requested_elements
            ),
            TilebenchError::DimensionMismatch { left, right } => write!(
                f,
                "Dimension mismatch: left operand is {}x{} but right operand is {}x{} \
                 (columns of the left matrix must equal rows of the right matrix)",
                left.0, left.1, right.0, right.1
            ),
            TilebenchError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            TilebenchError::ReportError { path, message } => {
                write!(f, "Report sink failure: {} (path: {})", message, path)
            }
        }
    }
}

impl std::error::Error for TilebenchError {}

/// Result type alias for tilebench operations.
pub type Result<T> = std::result::Result<T, TilebenchError>;

/// Creates an allocation error.
pub fn allocation_error(elements: usize, message: impl Into<String>) -> TilebenchError {
    TilebenchError::AllocationError {
        requested_elements: elements,
        message: message.into(),
    }
}

/// Creates a dimension mismatch error from two operand shapes.
pub fn dimension_mismatch(left: (usize, usize), right: (usize, usize)) -> TilebenchError {
    TilebenchError::DimensionMismatch { left, right }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> TilebenchError {
    TilebenchError::ValidationError {
        message: message.into(),
    }
}

/// Creates a report sink error.
pub fn report_error(path: impl Into<String>, message: impl Into<String>) -> TilebenchError {
    TilebenchError::ReportError {
        path: path.into(),
        message: message.into(),
    }
}
