//! LogProcessor - logs frame summary via tracing

use contracts::{
    ContractError, FragmentMetadata, Frame, FrameProcessor, TagProcessor, TrackMetadata,
};
use tracing::{info, instrument};

/// Processor that logs frame summaries for debugging
pub struct LogProcessor {
    name: String,
    frames_logged: u64,
}

impl LogProcessor {
    /// Create a new LogProcessor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames_logged: 0,
        }
    }

    /// Number of frames logged so far
    pub fn frames_logged(&self) -> u64 {
        self.frames_logged
    }

    fn log_frame_summary(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tag_count: Option<usize>,
    ) {
        self.frames_logged += 1;

        info!(
            processor = %self.name,
            track_number = frame.track_number,
            codec_id = track.codec_id.as_deref().unwrap_or("-"),
            timecode = frame.timecode,
            key_frame = frame.key_frame,
            size = frame.data.len(),
            fragment = fragment.map(|f| f.fragment_number.as_str()).unwrap_or("-"),
            tags = ?tag_count,
            "Frame received"
        );
    }
}

impl FrameProcessor for LogProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_processor_process",
        skip_all,
        fields(processor = %self.name, track_number = frame.track_number)
    )]
    fn process(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
    ) -> Result<(), ContractError> {
        self.log_frame_summary(frame, track, fragment, None);
        Ok(())
    }

    #[instrument(
        name = "log_processor_process_with_tags",
        skip_all,
        fields(processor = %self.name, track_number = frame.track_number)
    )]
    fn process_with_tags(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tags: Option<&dyn TagProcessor>,
    ) -> Result<(), ContractError> {
        self.log_frame_summary(frame, track, fragment, tags.map(|t| t.len()));
        Ok(())
    }

    #[instrument(name = "log_processor_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        info!(
            processor = %self.name,
            frames = self.frames_logged,
            "LogProcessor closed"
        );
        Ok(())
    }
}
