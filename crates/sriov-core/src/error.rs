// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for SR-IOV extender operations
#[derive(Error, Debug, Diagnostic)]
pub enum SriovError {
    /// A resource quantity could not be interpreted as a slot count
    #[error("Invalid quantity '{value}': {reason}")]
    #[diagnostic(
        code(sriov::invalid_quantity),
        help("Advertised capacity must be a non-negative Kubernetes quantity such as '8' or '1k'")
    )]
    InvalidQuantity {
        #[allow(unused)]
        value: String,
        #[allow(unused)]
        reason: String,
    },

    /// The filter request cannot be evaluated
    #[error("Invalid request: {reason}")]
    #[diagnostic(
        code(sriov::invalid_request),
        help("{suggestion}")
    )]
    InvalidRequest {
        #[allow(unused)]
        reason: String,
        #[allow(unused)]
        suggestion: String,
    },
}

/// Result type alias for SR-IOV extender operations
pub type Result<T> = std::result::Result<T, SriovError>;

impl SriovError {
    /// Create an InvalidQuantity error
    pub fn invalid_quantity(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRequest error
    pub fn invalid_request(reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }
}
