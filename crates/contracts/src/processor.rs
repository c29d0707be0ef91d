//! FrameProcessor trait - frame visitor output interface
//!
//! Two-tier contract: a processor that never asks for tag tracking only
//! implements `process`. A processor constructed alongside a tag processor
//! must implement `process_with_tags`, otherwise every frame is rejected
//! with `ContractError::Unimplemented`.

use crate::{Capability, ContractError, FragmentMetadata, Frame, TagProcessor, TrackMetadata};

/// Frame consumer trait
pub trait FrameProcessor {
    /// Processor name (used for logging/errors)
    fn name(&self) -> &str {
        "frame_processor"
    }

    /// Handle one frame
    ///
    /// # Errors
    /// Default implementation returns `Unimplemented(Process)`
    fn process(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
    ) -> Result<(), ContractError> {
        let _ = (frame, track, fragment);
        Err(ContractError::unimplemented(self.name(), Capability::Process))
    }

    /// Handle one frame together with the current cluster's tags
    ///
    /// Without a tag processor this is exactly `process`.
    ///
    /// # Errors
    /// Default implementation returns `Unimplemented(ProcessWithTags)` when
    /// `tags` is present
    fn process_with_tags(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tags: Option<&dyn TagProcessor>,
    ) -> Result<(), ContractError> {
        match tags {
            Some(_) => Err(ContractError::unimplemented(
                self.name(),
                Capability::ProcessWithTags,
            )),
            None => self.process(frame, track, fragment),
        }
    }

    /// Release resources held by the processor
    fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}

impl<P: FrameProcessor + ?Sized> FrameProcessor for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
    ) -> Result<(), ContractError> {
        (**self).process(frame, track, fragment)
    }

    fn process_with_tags(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tags: Option<&dyn TagProcessor>,
    ) -> Result<(), ContractError> {
        (**self).process_with_tags(frame, track, fragment, tags)
    }

    fn close(&mut self) -> Result<(), ContractError> {
        (**self).close()
    }
}
