//! TagProcessor trait - per-cluster tag accumulator
//!
//! Collects non-fragment `SimpleTag` name/value pairs. The frame dispatcher
//! clears it at every cluster exit, so a processor only ever holds the tags
//! of the cluster being read.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::FragmentMetadata;

/// One `SimpleTag` name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkvTag {
    pub name: String,
    pub value: String,
}

impl MkvTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Tag accumulator interface
pub trait TagProcessor {
    /// Record a tag seen in the stream
    fn process(&mut self, tag: &MkvTag, fragment: Option<&FragmentMetadata>);

    /// Drop all recorded tags. Must be a no-op when already empty.
    fn clear(&mut self);

    /// Latest value recorded under `name`
    fn get(&self, name: &str) -> Option<&str>;

    /// Number of recorded tags
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tag processor shared between the metadata tracker and the frame dispatcher
pub type SharedTagProcessor = Rc<RefCell<dyn TagProcessor>>;

/// Wrap a tag processor for sharing
pub fn share_tag_processor<T: TagProcessor + 'static>(processor: T) -> SharedTagProcessor {
    Rc::new(RefCell::new(processor))
}
