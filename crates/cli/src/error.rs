//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Neither a config file nor `--input` was given
    #[error("No input stream: pass --config or --input")]
    MissingInput,

    /// Configuration load or validation error
    #[error("Invalid configuration: {0}")]
    Config(#[from] ContractError),

    /// A line of the element stream could not be decoded
    #[error("Malformed element near byte {offset}: {message}")]
    MalformedElement { offset: usize, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn malformed_element(offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedElement {
            offset,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
