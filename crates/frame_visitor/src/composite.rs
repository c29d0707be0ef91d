//! CompositeVisitor - ordered visitor pipeline

use contracts::{ContractError, DataElement, ElementKind, ElementVisitor};

/// Applies each child visitor to every element, in insertion order
///
/// The first error stops the element from reaching later children.
#[derive(Default)]
pub struct CompositeVisitor {
    children: Vec<Box<dyn ElementVisitor>>,
}

impl CompositeVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visitor to the end of the pipeline
    pub fn push<V: ElementVisitor + 'static>(&mut self, visitor: V) {
        self.children.push(Box::new(visitor));
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl ElementVisitor for CompositeVisitor {
    fn visit_start_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        for child in &mut self.children {
            child.visit_start_master(kind)?;
        }
        Ok(())
    }

    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        for child in &mut self.children {
            child.visit_end_master(kind)?;
        }
        Ok(())
    }

    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        for child in &mut self.children {
            child.visit_data(element)?;
        }
        Ok(())
    }
}
