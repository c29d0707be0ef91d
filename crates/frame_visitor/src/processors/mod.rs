//! Processor implementations
//!
//! Contains LogProcessor and FileProcessor.

mod file;
mod log;

pub use self::file::{FileProcessor, FileProcessorConfig};
pub use self::log::LogProcessor;

use contracts::{FrameProcessor, ProcessorConfig, ProcessorType};
use tracing::instrument;

use crate::error::FrameVisitorError;

/// Create a processor from configuration
#[instrument(
    name = "frame_visitor_create_processor",
    skip(config),
    fields(processor = %config.name, processor_type = ?config.processor_type)
)]
pub fn create_processor(
    config: &ProcessorConfig,
) -> Result<Box<dyn FrameProcessor>, FrameVisitorError> {
    match config.processor_type {
        ProcessorType::Log => Ok(Box::new(LogProcessor::new(&config.name))),
        ProcessorType::File => {
            let processor = FileProcessor::from_params(&config.name, &config.params)
                .map_err(|e| FrameVisitorError::processor_creation(&config.name, e.to_string()))?;
            Ok(Box::new(processor))
        }
    }
}
