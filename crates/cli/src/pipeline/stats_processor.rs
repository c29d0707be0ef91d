//! Processor wrapper that aggregates per-frame statistics.

use contracts::{ContractError, FragmentMetadata, Frame, FrameProcessor, TagProcessor, TrackMetadata};
use observability::{record_frame_size, FrameMetricsAggregator};

/// Forwards every call to the wrapped processor and counts the frames it accepted
///
/// Both entry points forward to the same entry point on the inner processor,
/// so the inner processor's tier contract is preserved.
pub struct StatsProcessor<P> {
    inner: P,
    metrics: FrameMetricsAggregator,
}

impl<P: FrameProcessor> StatsProcessor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            metrics: FrameMetricsAggregator::new(),
        }
    }

    pub fn metrics(&self) -> &FrameMetricsAggregator {
        &self.metrics
    }

    fn record(&mut self, frame: &Frame, with_tags: bool) {
        self.metrics
            .update(frame.track_number, frame.data.len(), frame.key_frame, with_tags);
        record_frame_size(frame.track_number, frame.data.len());
    }
}

impl<P: FrameProcessor> FrameProcessor for StatsProcessor<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
    ) -> Result<(), ContractError> {
        self.inner.process(frame, track, fragment)?;
        self.record(frame, false);
        Ok(())
    }

    fn process_with_tags(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tags: Option<&dyn TagProcessor>,
    ) -> Result<(), ContractError> {
        self.inner.process_with_tags(frame, track, fragment, tags)?;
        self.record(frame, tags.is_some());
        Ok(())
    }

    fn close(&mut self) -> Result<(), ContractError> {
        self.inner.close()
    }
}
