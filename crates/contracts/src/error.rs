//! Layered error definitions
//!
//! Categorized by source: config / element / metadata / processor

use std::fmt;

use thiserror::Error;

use crate::ElementKind;

/// Processor entry point that was invoked without being implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `FrameProcessor::process`
    Process,
    /// `FrameProcessor::process_with_tags` with a tag processor attached
    ProcessWithTags,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => f.write_str("process"),
            Self::ProcessWithTags => f.write_str("process_with_tags"),
        }
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Element Stream Errors =====
    /// Malformed element payload
    #[error("element decode error for {kind:?}: {message}")]
    ElementDecode { kind: ElementKind, message: String },

    /// A frame element carried no value
    #[error("frame element {kind:?} has no value")]
    MissingFrameValue { kind: ElementKind },

    // ===== Metadata Errors =====
    /// Frame references a track that was never declared
    #[error("no track metadata for track number {track_number}")]
    UnknownTrack { track_number: u64 },

    // ===== Processor Errors =====
    /// Processor entry point not implemented
    #[error("frame processor '{processor}' does not implement {capability}")]
    Unimplemented {
        processor: String,
        capability: Capability,
    },

    /// Processor write error
    #[error("processor '{processor}' write error: {message}")]
    ProcessorWrite { processor: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create element decode error
    pub fn element_decode(kind: ElementKind, message: impl Into<String>) -> Self {
        Self::ElementDecode {
            kind,
            message: message.into(),
        }
    }

    /// Create unimplemented capability error
    pub fn unimplemented(processor: impl Into<String>, capability: Capability) -> Self {
        Self::Unimplemented {
            processor: processor.into(),
            capability,
        }
    }

    /// Create processor write error
    pub fn processor_write(processor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessorWrite {
            processor: processor.into(),
            message: message.into(),
        }
    }

    /// Whether this is the "capability not implemented" signal
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Self::Unimplemented { .. })
    }

    /// Short stable label, used as a metric dimension
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } => "config_parse",
            Self::ConfigValidation { .. } => "config_validation",
            Self::ElementDecode { .. } => "element_decode",
            Self::MissingFrameValue { .. } => "missing_frame_value",
            Self::UnknownTrack { .. } => "unknown_track",
            Self::Unimplemented { .. } => "unimplemented",
            Self::ProcessorWrite { .. } => "processor_write",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }
}
