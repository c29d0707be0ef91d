//! ElementVisitor / MetadataSource traits
//!
//! Visitors receive every node of the element stream in order. Handlers
//! default to no-ops so a visitor only implements the node shapes it acts on.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::{ContractError, DataElement, ElementKind, FragmentMetadata, MkvElement, TrackMetadata};

/// Element stream visitor
pub trait ElementVisitor {
    /// Master element opened
    fn visit_start_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        let _ = kind;
        Ok(())
    }

    /// Master element closed
    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        let _ = kind;
        Ok(())
    }

    /// Leaf element
    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        let _ = element;
        Ok(())
    }

    /// Route a node to the matching handler
    fn visit(&mut self, element: &MkvElement) -> Result<(), ContractError> {
        match element {
            MkvElement::StartMaster { kind } => self.visit_start_master(*kind),
            MkvElement::EndMaster { kind } => self.visit_end_master(*kind),
            MkvElement::Data(data) => self.visit_data(data),
        }
    }
}

/// Visitors shared with a composite keep their state reachable from outside
impl<V: ElementVisitor + ?Sized> ElementVisitor for Rc<RefCell<V>> {
    fn visit_start_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        self.borrow_mut().visit_start_master(kind)
    }

    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        self.borrow_mut().visit_end_master(kind)
    }

    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        self.borrow_mut().visit_data(element)
    }
}

/// Point-in-time metadata queries answered by the metadata tracker
pub trait MetadataSource {
    /// Metadata of a declared track
    ///
    /// # Errors
    /// Returns `UnknownTrack` if the track was never declared
    fn track_metadata(&self, track_number: u64) -> Result<Arc<TrackMetadata>, ContractError>;

    /// Fragment currently open, if any
    fn current_fragment_metadata(&self) -> Option<Arc<FragmentMetadata>>;
}
