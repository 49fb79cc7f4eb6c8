use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::rules::Rule;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("There is a markup error in {}", path.display())]
    MalformedMarkup { path: PathBuf, details: String },

    #[error("Block nesting in {} exceeds the maximum depth of {limit}", path.display())]
    NestingTooDeep { path: PathBuf, limit: usize },

    #[error("Invalid host url: {host}")]
    InvalidHostUrl { host: String },

    #[error("WPT validation failed: {} rule(s) broken", failures.len())]
    ValidationFailed { failures: Vec<Rule> },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Import command has already been run")]
    AlreadyRun,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    /// Shorthand for a [`ImportError::MissingField`]
    pub fn missing(field: impl Into<String>) -> Self {
        ImportError::MissingField {
            field: field.into(),
        }
    }

    /// True for failures raised before the document tree exists
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ImportError::NotFound { .. }
                | ImportError::MalformedMarkup { .. }
                | ImportError::NestingTooDeep { .. }
        )
    }
}

impl From<ConfigError> for ImportError {
    fn from(err: ConfigError) -> Self {
        ImportError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ImportError>;
