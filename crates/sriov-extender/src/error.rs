// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Extender error type
#[derive(Error, Debug, Diagnostic)]
pub enum ExtenderError {
    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(extender::invalid_config),
        help("{suggestion}")
    )]
    InvalidConfig {
        message: String,
        suggestion: String,
    },

    /// Core error
    #[error("Core error: {0}")]
    #[diagnostic(
        code(extender::core_error),
        help("Check the request payload")
    )]
    CoreError(#[from] sriov_core::SriovError),
}

/// Result type for extender operations
pub type Result<T> = std::result::Result<T, ExtenderError>;

impl ExtenderError {
    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}
