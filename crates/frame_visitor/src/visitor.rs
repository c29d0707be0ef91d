//! FrameVisitor - tracker + dispatcher pipeline

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use contracts::{
    ContractError, DataElement, ElementKind, ElementVisitor, FrameProcessor, MetadataSource,
    MkvElement, SharedTagProcessor,
};
use metadata_tracker::FragmentMetadataTracker;
use tracing::{error, info, instrument};

use crate::composite::CompositeVisitor;
use crate::dispatcher::FrameDispatcher;
use crate::metrics::DispatchMetrics;

/// Element visitor that hands every frame to a `FrameProcessor`
///
/// Pipeline order is fixed: the metadata tracker sees each element first,
/// then the frame dispatcher. A frame therefore always sees the track and
/// fragment metadata declared before it.
pub struct FrameVisitor<P> {
    tracker: Rc<RefCell<FragmentMetadataTracker>>,
    dispatcher: Rc<RefCell<FrameDispatcher<P>>>,
    pipeline: CompositeVisitor,
    tag_processor: Option<SharedTagProcessor>,
}

impl<P: FrameProcessor + 'static> FrameVisitor<P> {
    /// Create a visitor without tag tracking
    ///
    /// The processor only needs to implement `FrameProcessor::process`.
    pub fn create(processor: P) -> Self {
        Self::build(processor, None)
    }

    /// Create a visitor that collects per-cluster tags into `tag_processor`
    ///
    /// The processor must implement `FrameProcessor::process_with_tags`.
    pub fn create_with_tags(processor: P, tag_processor: SharedTagProcessor) -> Self {
        Self::build(processor, Some(tag_processor))
    }

    fn build(processor: P, tag_processor: Option<SharedTagProcessor>) -> Self {
        let tracker = Rc::new(RefCell::new(match &tag_processor {
            Some(tags) => FragmentMetadataTracker::with_tag_processor(Rc::clone(tags)),
            None => FragmentMetadataTracker::new(),
        }));

        let metadata: Rc<RefCell<dyn MetadataSource>> = tracker.clone();
        let dispatcher = Rc::new(RefCell::new(FrameDispatcher::new(
            metadata,
            processor,
            tag_processor.clone(),
        )));

        let mut pipeline = CompositeVisitor::new();
        pipeline.push(Rc::clone(&tracker));
        pipeline.push(Rc::clone(&dispatcher));

        Self {
            tracker,
            dispatcher,
            pipeline,
            tag_processor,
        }
    }

    /// Visit every element in order, stopping at the first error
    ///
    /// Returns the number of elements visited.
    ///
    /// # Errors
    /// Any error raised by the tracker, the dispatcher or the processor
    #[instrument(name = "frame_visitor_visit_all", skip_all)]
    pub fn visit_all<I>(&mut self, elements: I) -> Result<u64, ContractError>
    where
        I: IntoIterator,
        I::Item: std::borrow::Borrow<MkvElement>,
    {
        let mut visited = 0u64;
        for element in elements {
            let element: &MkvElement = std::borrow::Borrow::borrow(&element);
            if let Err(e) = self.visit(element) {
                error!(
                    index = visited,
                    kind = ?element.kind(),
                    error = %e,
                    "element visit failed"
                );
                observability::metrics::record_traversal_failed(e.label());
                return Err(e);
            }
            visited += 1;
        }
        info!(elements = visited, "element stream finished");
        Ok(visited)
    }

    /// Close the frame processor
    ///
    /// Idempotent: the processor is closed at most once.
    pub fn close(&mut self) -> Result<(), ContractError> {
        self.dispatcher.borrow_mut().close()
    }

    /// Metadata tracker state
    pub fn tracker(&self) -> Ref<'_, FragmentMetadataTracker> {
        self.tracker.borrow()
    }

    /// The wrapped processor
    pub fn processor(&self) -> Ref<'_, P> {
        Ref::map(self.dispatcher.borrow(), |d| d.processor())
    }

    /// Tag processor shared by tracker and dispatcher, if configured
    pub fn tag_processor(&self) -> Option<&SharedTagProcessor> {
        self.tag_processor.as_ref()
    }

    /// Dispatch counters
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(self.dispatcher.borrow().metrics())
    }
}

impl<P: FrameProcessor + 'static> ElementVisitor for FrameVisitor<P> {
    fn visit_start_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        self.count_element();
        self.pipeline.visit_start_master(kind)
    }

    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        self.count_element();
        self.pipeline.visit_end_master(kind)
    }

    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        self.count_element();
        self.pipeline.visit_data(element)
    }
}

impl<P: FrameProcessor + 'static> FrameVisitor<P> {
    fn count_element(&self) {
        self.dispatcher.borrow().metrics().inc_elements_visited();
    }
}
