//! FrameDispatcher - routes SimpleBlock frames to a processor

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use contracts::{
    ContractError, DataElement, ElementKind, ElementVisitor, FrameProcessor, MetadataSource,
    SharedTagProcessor,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::metrics::DispatchMetrics;

/// Dispatches frames with their track and fragment context
///
/// Visited after the metadata tracker for every element. Acts on two kinds
/// only: `SimpleBlock` data elements (dispatch) and `Cluster` exits (clear
/// the tag processor). Everything else is a no-op.
pub struct FrameDispatcher<P> {
    metadata: Rc<RefCell<dyn MetadataSource>>,
    processor: P,
    tag_processor: Option<SharedTagProcessor>,
    metrics: Arc<DispatchMetrics>,
    closed: bool,
}

impl<P: FrameProcessor> FrameDispatcher<P> {
    /// Create a dispatcher reading context from `metadata`
    pub fn new(
        metadata: Rc<RefCell<dyn MetadataSource>>,
        processor: P,
        tag_processor: Option<SharedTagProcessor>,
    ) -> Self {
        Self {
            metadata,
            processor,
            tag_processor,
            metrics: Arc::new(DispatchMetrics::new()),
            closed: false,
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// Shared dispatch counters
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the processor
    ///
    /// The processor's `close` runs at most once; later calls return `Ok(())`.
    #[instrument(name = "frame_dispatcher_close", skip(self), fields(processor = %self.processor.name()))]
    pub fn close(&mut self) -> Result<(), ContractError> {
        if self.closed {
            debug!("processor already closed");
            return Ok(());
        }
        self.closed = true;

        let snapshot = self.metrics.snapshot();
        info!(
            frames = snapshot.frames_dispatched,
            clusters = snapshot.clusters_closed,
            "closing frame processor"
        );
        self.processor.close()
    }

    fn clear_tags(&mut self) {
        if let Some(tag_processor) = &self.tag_processor {
            tag_processor.borrow_mut().clear();
            trace!("cluster closed, tags cleared");
        }
        self.metrics.inc_clusters_closed();
        observability::metrics::record_cluster_closed();
    }

    fn dispatch_frame(&mut self, element: &DataElement) -> Result<(), ContractError> {
        let frame = element
            .frame_value()?
            .ok_or(ContractError::MissingFrameValue { kind: element.kind })?;

        let (track, fragment) = {
            let metadata = self.metadata.borrow();
            (
                metadata.track_metadata(frame.track_number)?,
                metadata.current_fragment_metadata(),
            )
        };

        if self.closed {
            warn!(
                track_number = frame.track_number,
                "frame dispatched after processor close"
            );
        }

        let tags = self.tag_processor.as_ref().map(|t| t.borrow());
        self.processor
            .process_with_tags(&frame, &track, fragment.as_deref(), tags.as_deref())?;

        self.metrics.inc_frames_dispatched();
        observability::metrics::record_frame_dispatched(self.processor.name(), frame.track_number);

        let count = self.metrics.frames_dispatched();
        if count.is_multiple_of(1000) {
            debug!(frames = count, "FrameDispatcher progress");
        }
        Ok(())
    }
}

impl<P: FrameProcessor> ElementVisitor for FrameDispatcher<P> {
    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        if kind == ElementKind::Cluster {
            self.clear_tags();
        }
        Ok(())
    }

    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        if element.kind == ElementKind::SimpleBlock {
            self.dispatch_frame(element)?;
        }
        Ok(())
    }
}
