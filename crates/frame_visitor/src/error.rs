//! Frame visitor error types

use thiserror::Error;

/// Frame visitor specific errors
#[derive(Debug, Error)]
pub enum FrameVisitorError {
    /// Processor creation error
    #[error("failed to create processor '{name}': {message}")]
    ProcessorCreation { name: String, message: String },
}

impl FrameVisitorError {
    /// Create a processor creation error
    pub fn processor_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessorCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
