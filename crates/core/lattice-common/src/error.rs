//! Error handling types and utilities for the Lattice ecosystem.
//!
//! This module provides standardized error types that are used throughout
//! all Lattice crates to ensure consistent error handling patterns.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// The main error type for the Lattice ecosystem.
///
/// This enum provides a comprehensive set of error variants that cover
/// common error scenarios across all Lattice components.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeError {
    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Text encoding detection/decoding errors
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Named lock registry errors
    #[error("Lock error: {0}")]
    Lock(String),

    /// Cryptographic operation errors
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Target of the operation has already been torn down.
    ///
    /// Execution wrappers swallow this variant without reporting it.
    #[error("Disposed: {0}")]
    Disposed(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic application errors with context
    #[error("Application error: {message} (context: {context})")]
    Application {
        /// Error message
        message: String,
        /// Error context
        context: String,
    },
}

impl LatticeError {
    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Self::InvalidInput(msg.to_string())
    }

    /// Create a new not found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Self::NotFound(msg.to_string())
    }

    /// Create a new encoding error
    pub fn encoding<T: fmt::Display>(msg: T) -> Self {
        Self::Encoding(msg.to_string())
    }

    /// Create a new serialization error
    pub fn serialization<T: fmt::Display>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Create a new lock error
    pub fn lock<T: fmt::Display>(msg: T) -> Self {
        Self::Lock(msg.to_string())
    }

    /// Create a new cryptographic error
    pub fn crypto<T: fmt::Display>(msg: T) -> Self {
        Self::Crypto(msg.to_string())
    }

    /// Create a new timeout error
    pub fn timeout<T: fmt::Display>(msg: T) -> Self {
        Self::Timeout(msg.to_string())
    }

    /// Create a new disposed error
    pub fn disposed<T: fmt::Display>(msg: T) -> Self {
        Self::Disposed(msg.to_string())
    }

    /// Create a new internal error
    pub fn internal<T: fmt::Display>(msg: T) -> Self {
        Self::Internal(msg.to_string())
    }

    /// Create a new application error with context
    pub fn application<T: fmt::Display, U: fmt::Display>(message: T, context: U) -> Self {
        Self::Application {
            message: message.to_string(),
            context: context.to_string(),
        }
    }

    /// Check if this error is a client error (bad caller input)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Internal(_))
    }

    /// Check if this error signals an already torn-down target
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed(_))
    }
}

/// Result type alias for Lattice operations
pub type LatticeResult<T> = Result<T, LatticeError>;

// Standard error conversions
impl From<std::io::Error> for LatticeError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for LatticeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LatticeError {
    fn from(err: chrono::ParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<std::str::Utf8Error> for LatticeError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<base64::DecodeError> for LatticeError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
