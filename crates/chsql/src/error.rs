//! Error types for chsql

use thiserror::Error;

/// Result type alias for chsql operations
pub type ChResult<T> = Result<T, ChError>;

/// Error types for statement construction and execution
#[derive(Debug, Clone, Error)]
pub enum ChError {
    /// Invalid or missing construction options
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An ignore-rule name was referenced but never registered
    #[error("Unknown ignore rule: {0}")]
    UnknownRule(String),

    /// Template/argument mismatch during statement formatting
    #[error("Format error: {0}")]
    Format(String),

    /// Whatever the driver reported (connectivity, syntax, server-side failure)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Structurally invalid builder state at build time
    #[error("Builder error: {0}")]
    Builder(String),

    /// Row value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ChError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an unknown-rule error for a rule name
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule(name.into())
    }

    /// Create a format error
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a builder error
    pub fn builder(message: impl Into<String>) -> Self {
        Self::Builder(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is an unknown-rule error
    pub fn is_unknown_rule(&self) -> bool {
        matches!(self, Self::UnknownRule(_))
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Check if this is a builder error
    pub fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }
}
